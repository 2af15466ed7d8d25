//! Recording shutdown
//!
//! Stops the tracked capture process in two stages:
//!
//! ```text
//! NoSession ──(state file missing)──▶ return
//! GraceWait ──settle_delay──▶ Signaled (SIGINT) ──shutdown_grace──▶
//! EscalationCheck ──(still alive)──▶ SIGKILL ──▶ Done (state file removed)
//! ```

use std::fmt;
use tracing::{debug, error, info, warn};

use crate::config::{RecorderConfig, Timing};
use crate::error::{NoircamError, Result};
use crate::process::{ProcessControl, UnixSignals};
use crate::state::StateFile;

/// Stage of the stop sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopPhase {
    /// No state file, nothing to stop
    NoSession,
    /// Waiting for the motion event to settle
    GraceWait,
    /// Interrupt delivered, waiting for the process to exit
    Signaled,
    /// Checking whether a forced kill is needed
    EscalationCheck,
    /// State file removed
    Done,
}

impl fmt::Display for StopPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoSession => "no-session",
            Self::GraceWait => "grace-wait",
            Self::Signaled => "signaled",
            Self::EscalationCheck => "escalation-check",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// How a stop request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// No recording was tracked
    NoSession,
    /// The process exited after SIGINT
    Graceful { pid: u32 },
    /// The process survived SIGINT and was killed
    Forced { pid: u32 },
}

impl fmt::Display for StopOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSession => write!(f, "no recording was running"),
            Self::Graceful { pid } => write!(f, "PID {} exited gracefully", pid),
            Self::Forced { pid } => write!(f, "PID {} was killed", pid),
        }
    }
}

/// Stops recordings
pub struct Terminator<P: ProcessControl = UnixSignals> {
    state: StateFile,
    timing: Timing,
    control: P,
}

impl Terminator<UnixSignals> {
    /// Create a terminator from configuration
    pub fn new(config: &RecorderConfig) -> Self {
        Self::with_control(config, UnixSignals)
    }
}

impl<P: ProcessControl> Terminator<P> {
    /// Create a terminator with a custom process controller
    pub fn with_control(config: &RecorderConfig, control: P) -> Self {
        Self {
            state: StateFile::new(config.state_file.clone()),
            timing: config.timing,
            control,
        }
    }

    /// Process controller in use
    pub fn control(&self) -> &P {
        &self.control
    }

    /// Stop the tracked recording
    ///
    /// Errors leave the state file in place. A PID that no longer exists is
    /// reported as `ProcessNotFound` and the file is kept, so `status` can
    /// show it as stale.
    pub async fn stop(&self) -> Result<StopOutcome> {
        if !self.state.exists() {
            debug!(phase = %StopPhase::NoSession, "Stop sequence");
            warn!(
                "PID file not found, cannot stop recording: {}",
                self.state.path().display()
            );
            return Ok(StopOutcome::NoSession);
        }

        debug!(phase = %StopPhase::GraceWait, "Stop sequence");
        info!(
            "Waiting {:?} before stopping recording",
            self.timing.settle_delay
        );
        tokio::time::sleep(self.timing.settle_delay).await;

        let pid = self.state.read_pid()?;

        info!("Sending SIGINT to recording process with PID={}", pid);
        match self.control.interrupt(pid) {
            Ok(()) => {}
            Err(NoircamError::ProcessNotFound(_)) => {
                error!("No process with PID={}, keeping PID file", pid);
                return Err(NoircamError::ProcessNotFound(pid));
            }
            Err(e) => return Err(e),
        }

        debug!(phase = %StopPhase::Signaled, "Stop sequence");
        tokio::time::sleep(self.timing.shutdown_grace).await;

        debug!(phase = %StopPhase::EscalationCheck, "Stop sequence");
        let outcome = if self.control.is_alive(pid) {
            info!("Process still alive, sending SIGKILL...");
            match self.control.kill(pid) {
                Ok(()) => StopOutcome::Forced { pid },
                Err(NoircamError::ProcessNotFound(_)) => {
                    info!("Process exited before SIGKILL");
                    StopOutcome::Graceful { pid }
                }
                Err(e) => return Err(e),
            }
        } else {
            info!("Process exited gracefully.");
            StopOutcome::Graceful { pid }
        };

        self.finish(outcome)
    }

    fn finish(&self, outcome: StopOutcome) -> Result<StopOutcome> {
        self.state.remove()?;
        info!("PID file removed: {}", self.state.path().display());

        debug!(phase = %StopPhase::Done, "Stop sequence");
        info!("Recording stopped: {}", outcome);
        Ok(outcome)
    }
}
