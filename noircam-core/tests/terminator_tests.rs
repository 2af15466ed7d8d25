//! Integration tests for the stop sequence
//!
//! Mocked tests check which signals are sent; the real-process tests at the
//! bottom spawn `sleep` children and stop them with actual signals.

mod mocks;

use mocks::{config_in, count_files, fast_timing, Behaviour, Call, MockControl};
use noircam_core::config::Timing;
use noircam_core::error::NoircamError;
use noircam_core::state::StateFile;
use noircam_core::terminator::{StopOutcome, Terminator};
use std::os::unix::process::ExitStatusExt;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;

#[tokio::test]
async fn test_stop_without_state_file_is_noop() {
    let temp = TempDir::new().unwrap();
    let config = config_in(temp.path());
    let terminator = Terminator::with_control(&config, MockControl::new(Behaviour::ExitsOnInterrupt));

    let started = Instant::now();
    let outcome = terminator.stop().await.unwrap();

    assert_eq!(outcome, StopOutcome::NoSession);
    assert!(terminator.control().calls().is_empty());
    assert_eq!(count_files(temp.path()), 0);
    // No grace delay when there is nothing to stop
    assert!(started.elapsed() < fast_timing().settle_delay);
}

#[tokio::test]
async fn test_graceful_stop_skips_kill() {
    let temp = TempDir::new().unwrap();
    let config = config_in(temp.path());
    StateFile::new(&config.state_file).write_pid(4321).unwrap();

    let terminator = Terminator::with_control(&config, MockControl::new(Behaviour::ExitsOnInterrupt));
    let outcome = terminator.stop().await.unwrap();

    assert_eq!(outcome, StopOutcome::Graceful { pid: 4321 });
    assert_eq!(
        terminator.control().calls(),
        vec![Call::Interrupt(4321), Call::Probe(4321)]
    );
    assert!(!config.state_file.exists());
}

#[tokio::test]
async fn test_surviving_process_is_killed() {
    let temp = TempDir::new().unwrap();
    let config = config_in(temp.path());
    StateFile::new(&config.state_file).write_pid(777).unwrap();

    let terminator = Terminator::with_control(&config, MockControl::new(Behaviour::IgnoresInterrupt));
    let outcome = terminator.stop().await.unwrap();

    assert_eq!(outcome, StopOutcome::Forced { pid: 777 });
    assert_eq!(
        terminator.control().calls(),
        vec![Call::Interrupt(777), Call::Probe(777), Call::Kill(777)]
    );
    assert!(!config.state_file.exists());
}

#[tokio::test]
async fn test_stale_pid_keeps_state_file() {
    let temp = TempDir::new().unwrap();
    let config = config_in(temp.path());
    StateFile::new(&config.state_file).write_pid(99).unwrap();

    let terminator = Terminator::with_control(&config, MockControl::new(Behaviour::AlreadyGone));
    let err = terminator.stop().await.unwrap_err();

    assert!(matches!(err, NoircamError::ProcessNotFound(99)));
    assert_eq!(terminator.control().calls(), vec![Call::Interrupt(99)]);
    assert_eq!(StateFile::new(&config.state_file).read_pid().unwrap(), 99);
}

#[tokio::test]
async fn test_reaped_pid_keeps_state_file() {
    let temp = TempDir::new().unwrap();
    let config = config_in(temp.path());

    let mut child = Command::new("true").spawn().unwrap();
    let pid = child.id();
    child.wait().unwrap();
    StateFile::new(&config.state_file).write_pid(pid).unwrap();

    let err = Terminator::new(&config).stop().await.unwrap_err();

    assert!(matches!(err, NoircamError::ProcessNotFound(p) if p == pid));
    assert!(config.state_file.exists());
}

#[tokio::test]
async fn test_permission_denied_keeps_state_file() {
    let temp = TempDir::new().unwrap();
    let config = config_in(temp.path());
    StateFile::new(&config.state_file).write_pid(1).unwrap();

    let terminator = Terminator::with_control(&config, MockControl::new(Behaviour::PermissionDenied));
    let err = terminator.stop().await.unwrap_err();

    assert!(matches!(err, NoircamError::Signal { pid: 1, .. }));
    assert!(config.state_file.exists());
}

#[tokio::test]
async fn test_corrupt_state_file_is_an_error() {
    let temp = TempDir::new().unwrap();
    let config = config_in(temp.path());
    std::fs::write(&config.state_file, "not a pid").unwrap();

    let terminator = Terminator::with_control(&config, MockControl::new(Behaviour::ExitsOnInterrupt));
    let err = terminator.stop().await.unwrap_err();

    assert!(matches!(err, NoircamError::InvalidPid(_)));
    assert!(terminator.control().calls().is_empty());
    // Left in place for inspection
    assert!(config.state_file.exists());
}

#[tokio::test]
async fn test_stop_waits_for_both_delays() {
    let temp = TempDir::new().unwrap();
    let timing = Timing {
        settle_delay: Duration::from_millis(60),
        shutdown_grace: Duration::from_millis(90),
    };
    let config = config_in(temp.path()).with_timing(timing);
    StateFile::new(&config.state_file).write_pid(2024).unwrap();

    let terminator = Terminator::with_control(&config, MockControl::new(Behaviour::ExitsOnInterrupt));
    let started = Instant::now();
    terminator.stop().await.unwrap();

    assert!(started.elapsed() >= timing.total());
}

#[tokio::test]
async fn test_real_process_exits_on_interrupt() {
    let temp = TempDir::new().unwrap();
    let config = config_in(temp.path());

    let mut child = Command::new("sleep")
        .arg("30")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    let pid = child.id();
    StateFile::new(&config.state_file).write_pid(pid).unwrap();

    // Reap as soon as it exits; an unreaped zombie would still answer kill(pid, 0)
    let reaper = std::thread::spawn(move || child.wait());

    let outcome = Terminator::new(&config).stop().await.unwrap();

    let status = reaper.join().unwrap().unwrap();
    assert_eq!(status.signal(), Some(libc::SIGINT));
    assert_eq!(outcome, StopOutcome::Graceful { pid });
    assert!(!config.state_file.exists());
}

#[tokio::test]
async fn test_real_process_ignoring_interrupt_is_killed() {
    let temp = TempDir::new().unwrap();
    let config = config_in(temp.path());

    // SIG_IGN survives exec, so `sleep` inherits the ignored SIGINT
    let mut child = Command::new("sh")
        .args(["-c", "trap '' INT; exec sleep 30"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    // Give the shell time to install the trap before it is signalled
    std::thread::sleep(Duration::from_millis(200));
    StateFile::new(&config.state_file).write_pid(child.id()).unwrap();

    let terminator = Terminator::new(&config);
    let outcome = terminator.stop().await.unwrap();

    let status = child.wait().unwrap();
    assert_eq!(status.signal(), Some(libc::SIGKILL));
    assert_eq!(outcome, StopOutcome::Forced { pid: child.id() });
    assert!(!config.state_file.exists());
}
