//! Error types for noircam

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using NoircamError
pub type Result<T> = std::result::Result<T, NoircamError>;

/// Main error type for noircam operations
#[derive(Debug, Error)]
pub enum NoircamError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Capture program could not be started
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// State (PID) file could not be read, written or removed
    #[error("State file {}: {source}", path.display())]
    StateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// State file contents are not a usable process ID
    #[error("Invalid PID in state file: {0:?}")]
    InvalidPid(String),

    /// Process ID no longer maps to a running process
    #[error("No process with PID {0}")]
    ProcessNotFound(u32),

    /// Signal delivery failed for a reason other than a missing process
    #[error("Failed to send {signal} to PID {pid}: {source}")]
    Signal {
        pid: u32,
        signal: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// No recording session is tracked
    #[error("No active recording session")]
    NoActiveSession,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<NoircamError>,
    },
}

impl NoircamError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a state file error for `path`
    pub fn state_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StateFile {
            path: path.into(),
            source,
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping any context wrappers
    pub fn root(&self) -> &NoircamError {
        match self {
            Self::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// A short hint telling the user what to check, if there is one
    pub fn user_hint(&self) -> Option<&'static str> {
        match self.root() {
            Self::Config(_) => Some("Check ~/.config/noircam/config.toml (see `noircam config sample`)"),
            Self::Spawn { .. } => {
                Some("Make sure the capture program (libcamera-vid) is installed and on PATH")
            }
            Self::StateFile { .. } => {
                Some("Check that the state file directory exists and is writable")
            }
            Self::InvalidPid(_) => {
                Some("The state file is corrupt; remove it and start a new recording")
            }
            Self::ProcessNotFound(_) | Self::NoActiveSession => {
                Some("The recording already ended; nothing to stop")
            }
            Self::Signal { .. } => {
                Some("The recording process may belong to another user")
            }
            _ => None,
        }
    }

    /// Whether the user can fix this without code changes
    pub fn is_user_recoverable(&self) -> bool {
        matches!(
            self.root(),
            Self::Config(_)
                | Self::Spawn { .. }
                | Self::StateFile { .. }
                | Self::InvalidPid(_)
                | Self::ProcessNotFound(_)
                | Self::NoActiveSession
        )
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
