//! PID state file
//!
//! A single plain-text file holding the decimal PID of the running capture
//! process. Only one recording can be tracked at a time: starting a second
//! one overwrites the first PID.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{NoircamError, Result};

/// Handle to the PID state file
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    /// Create a handle for the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the state file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a session is currently tracked
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write `pid`, replacing any previous contents
    pub fn write_pid(&self, pid: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| NoircamError::state_file(parent, e))?;
            }
        }

        std::fs::write(&self.path, pid.to_string())
            .map_err(|e| NoircamError::state_file(&self.path, e))?;

        debug!("Wrote PID {} to {:?}", pid, self.path);
        Ok(())
    }

    /// Read the tracked PID
    pub fn read_pid(&self) -> Result<u32> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                NoircamError::NoActiveSession
            } else {
                NoircamError::state_file(&self.path, e)
            }
        })?;
        parse_pid(&content)
    }

    /// Read the tracked PID, or `None` when no session is tracked
    pub fn current(&self) -> Result<Option<u32>> {
        match self.read_pid() {
            Ok(pid) => Ok(Some(pid)),
            Err(NoircamError::NoActiveSession) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete the state file; a file that is already gone is not an error
    pub fn remove(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(NoircamError::state_file(&self.path, e)),
        }
    }
}

/// Parse state file contents into a PID that is safe to signal
///
/// `0` and values above `i32::MAX` are rejected: as a `pid_t` they would
/// address a process group instead of a single process.
pub fn parse_pid(content: &str) -> Result<u32> {
    let trimmed = content.trim();
    let pid: u32 = trimmed
        .parse()
        .map_err(|_| NoircamError::InvalidPid(trimmed.to_string()))?;

    if pid == 0 || pid > i32::MAX as u32 {
        return Err(NoircamError::InvalidPid(trimmed.to_string()));
    }

    Ok(pid)
}
