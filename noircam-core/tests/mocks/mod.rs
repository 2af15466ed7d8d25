//! Mock infrastructure for testing
//!
//! Provides a scripted process controller and helpers for building
//! configurations that live entirely inside a temporary directory.

#![allow(dead_code)]

use noircam_core::config::{RecorderConfig, Timing};
use noircam_core::error::{NoircamError, Result};
use noircam_core::process::ProcessControl;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

/// A signal or probe observed by [`MockControl`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Interrupt(u32),
    Kill(u32),
    Probe(u32),
}

/// How the mock process reacts to SIGINT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    /// Exits on SIGINT
    ExitsOnInterrupt,
    /// Ignores SIGINT and must be killed
    IgnoresInterrupt,
    /// Already gone before anything is sent
    AlreadyGone,
    /// Owned by someone else; every signal fails with EPERM
    PermissionDenied,
}

/// Scripted [`ProcessControl`] that records every call
pub struct MockControl {
    behaviour: Behaviour,
    calls: Mutex<Vec<Call>>,
}

impl MockControl {
    /// Create a mock with the given behaviour
    pub fn new(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Calls made so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn denied(pid: u32, signal: &'static str) -> NoircamError {
        NoircamError::Signal {
            pid,
            signal,
            source: std::io::Error::from_raw_os_error(libc::EPERM),
        }
    }
}

impl ProcessControl for MockControl {
    fn interrupt(&self, pid: u32) -> Result<()> {
        self.record(Call::Interrupt(pid));
        match self.behaviour {
            Behaviour::AlreadyGone => Err(NoircamError::ProcessNotFound(pid)),
            Behaviour::PermissionDenied => Err(Self::denied(pid, "SIGINT")),
            _ => Ok(()),
        }
    }

    fn kill(&self, pid: u32) -> Result<()> {
        self.record(Call::Kill(pid));
        match self.behaviour {
            Behaviour::IgnoresInterrupt => Ok(()),
            Behaviour::PermissionDenied => Err(Self::denied(pid, "SIGKILL")),
            _ => Err(NoircamError::ProcessNotFound(pid)),
        }
    }

    fn is_alive(&self, pid: u32) -> bool {
        self.record(Call::Probe(pid));
        let interrupted = self.calls().contains(&Call::Interrupt(pid));
        match self.behaviour {
            Behaviour::ExitsOnInterrupt => !interrupted,
            Behaviour::IgnoresInterrupt | Behaviour::PermissionDenied => true,
            Behaviour::AlreadyGone => false,
        }
    }
}

/// Short delays so stop sequences finish quickly
pub fn fast_timing() -> Timing {
    Timing {
        settle_delay: Duration::from_millis(20),
        shutdown_grace: Duration::from_millis(30),
    }
}

/// Configuration with output, state file and program under `dir`
pub fn config_in(dir: &Path) -> RecorderConfig {
    RecorderConfig::default()
        .with_output_root(dir.join("motion"))
        .with_state_file(dir.join("noircam.pid"))
        .with_timing(fast_timing())
}

/// Number of files (not directories) anywhere under `dir`
pub fn count_files(dir: &Path) -> usize {
    let mut count = 0;
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                count += count_files(&path);
            } else {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_calls_in_order() {
        let mock = MockControl::new(Behaviour::IgnoresInterrupt);
        mock.interrupt(10).unwrap();
        assert!(mock.is_alive(10));
        mock.kill(10).unwrap();
        assert_eq!(
            mock.calls(),
            vec![Call::Interrupt(10), Call::Probe(10), Call::Kill(10)]
        );
    }

    #[test]
    fn test_mock_exits_on_interrupt() {
        let mock = MockControl::new(Behaviour::ExitsOnInterrupt);
        assert!(mock.is_alive(5));
        mock.interrupt(5).unwrap();
        assert!(!mock.is_alive(5));
    }
}
