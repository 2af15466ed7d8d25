//! Status command - show the tracked recording

use anyhow::Result;
use noircam_core::{ProcessControl, RecorderConfig, StateFile, UnixSignals};

/// Show whether a recording is tracked and still running
pub async fn status(config: &RecorderConfig) -> Result<()> {
    println!("noircam - Status\n");

    let state = StateFile::new(&config.state_file);
    println!("  State file: {}", state.path().display());

    match state.current() {
        Ok(None) => println!("  State:      idle (no recording tracked)"),
        Ok(Some(pid)) => {
            println!("  PID:        {}", pid);
            if UnixSignals.is_alive(pid) {
                println!("  State:      recording");
            } else {
                println!("  State:      stale (process is not running)");
                println!();
                println!("Run 'noircam stop' to clear the state file.");
            }
        }
        Err(e) => println!("  State:      unreadable ({})", e),
    }

    Ok(())
}
