//! Start command - launch a recording in the background

use anyhow::Result;
use noircam_core::{Launcher, RecorderConfig};
use tracing::info;

use super::log_failure;

/// Start a recording and return immediately
///
/// Launch failures are logged, never returned: the caller (usually the
/// motion daemon) only cares that the hook ran.
pub async fn start(config: &RecorderConfig) -> Result<()> {
    info!("start called");

    let launcher = Launcher::new(config);
    match launcher.start() {
        Ok(session) => info!(
            "Recording PID {} to {}",
            session.pid,
            session.output_path.display()
        ),
        Err(e) => log_failure("Error launching capture program", &e),
    }

    Ok(())
}
