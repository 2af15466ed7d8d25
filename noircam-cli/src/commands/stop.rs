//! Stop command - stop the current recording

use anyhow::Result;
use noircam_core::{RecorderConfig, Terminator};
use tracing::info;

use super::log_failure;

/// Stop the tracked recording, interrupting first and killing if needed
pub async fn stop(config: &RecorderConfig) -> Result<()> {
    info!("stop called");

    let terminator = Terminator::new(config);
    match terminator.stop().await {
        Ok(outcome) => info!("Stop finished: {}", outcome),
        Err(e) => log_failure("Error stopping capture program", &e),
    }

    Ok(())
}
