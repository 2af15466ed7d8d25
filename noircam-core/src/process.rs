//! Process signalling
//!
//! [`ProcessControl`] is the seam between the stop sequence and the OS. The
//! production implementation, [`UnixSignals`], delivers signals with
//! `kill(2)`.

use std::io;
use tracing::debug;

use crate::error::{NoircamError, Result};

/// Signal delivery and liveness probing for a single PID
pub trait ProcessControl {
    /// Ask the process to stop (SIGINT, as if Ctrl+C was pressed)
    fn interrupt(&self, pid: u32) -> Result<()>;

    /// Terminate the process unconditionally (SIGKILL)
    fn kill(&self, pid: u32) -> Result<()>;

    /// Whether a process with this PID exists
    fn is_alive(&self, pid: u32) -> bool;
}

/// Signals delivered through `libc::kill`
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixSignals;

impl UnixSignals {
    fn send(pid: u32, signal: libc::c_int, name: &'static str) -> Result<()> {
        let target = to_pid_t(pid)?;

        debug!("Sending {} to PID {}", name, pid);
        // SAFETY: kill(2) has no memory-safety preconditions; `target` is a
        // positive pid_t so it only ever addresses a single process.
        let rc = unsafe { libc::kill(target, signal) };
        if rc == 0 {
            return Ok(());
        }

        let err = io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::ESRCH) {
            Err(NoircamError::ProcessNotFound(pid))
        } else {
            Err(NoircamError::Signal {
                pid,
                signal: name,
                source: err,
            })
        }
    }
}

impl ProcessControl for UnixSignals {
    fn interrupt(&self, pid: u32) -> Result<()> {
        Self::send(pid, libc::SIGINT, "SIGINT")
    }

    fn kill(&self, pid: u32) -> Result<()> {
        Self::send(pid, libc::SIGKILL, "SIGKILL")
    }

    fn is_alive(&self, pid: u32) -> bool {
        let Ok(target) = to_pid_t(pid) else {
            return false;
        };

        // SAFETY: signal 0 performs only the existence and permission checks.
        let rc = unsafe { libc::kill(target, 0) };
        if rc == 0 {
            return true;
        }

        // EPERM: the process exists but belongs to someone else
        io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
    }
}

fn to_pid_t(pid: u32) -> Result<libc::pid_t> {
    match libc::pid_t::try_from(pid) {
        Ok(p) if p > 0 => Ok(p),
        _ => Err(NoircamError::InvalidPid(pid.to_string())),
    }
}
