//! Capture process launcher
//!
//! Spawns the capture program in the background and records its PID in the
//! state file so a later `stop` can find it.

use chrono::{DateTime, Local};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{info, warn};

use crate::config::{CaptureSettings, RecorderConfig};
use crate::error::{NoircamError, Result, ResultExt};
use crate::paths::OutputLayout;
use crate::process::{ProcessControl, UnixSignals};
use crate::state::StateFile;

/// Argument vector for the capture program
#[derive(Debug, Clone)]
pub struct CaptureCommand {
    settings: CaptureSettings,
}

impl CaptureCommand {
    /// Create a command from capture settings
    pub fn new(settings: CaptureSettings) -> Self {
        Self { settings }
    }

    /// Program to execute
    pub fn program(&self) -> &str {
        &self.settings.program
    }

    /// Arguments recording to `output` with no time limit
    pub fn args(&self, output: &Path) -> Vec<OsString> {
        let s = &self.settings;
        vec![
            "--camera".into(),
            s.camera.to_string().into(),
            "--codec".into(),
            s.codec.clone().into(),
            "--width".into(),
            s.width.to_string().into(),
            "--height".into(),
            s.height.to_string().into(),
            // 0 = record until stopped
            "-t".into(),
            "0".into(),
            "-o".into(),
            output.as_os_str().to_os_string(),
        ]
    }

    /// Command line as a single string, for logging
    pub fn command_line(&self, output: &Path) -> String {
        let mut parts = vec![self.program().to_string()];
        parts.extend(
            self.args(output)
                .iter()
                .map(|a| a.to_string_lossy().into_owned()),
        );
        parts.join(" ")
    }

    fn spawn(&self, output: &Path) -> Result<u32> {
        let child = Command::new(self.program())
            .args(self.args(output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| NoircamError::Spawn {
                program: self.program().to_string(),
                source,
            })?;

        // The child is intentionally not waited on; it records until stopped.
        Ok(child.id())
    }
}

/// A recording started by [`Launcher::start`]
#[derive(Debug, Clone)]
pub struct RecordingSession {
    /// PID of the capture process
    pub pid: u32,
    /// File the capture process is writing
    pub output_path: PathBuf,
    /// When the recording was started
    pub started_at: DateTime<Local>,
}

/// Starts recordings
pub struct Launcher<P: ProcessControl = UnixSignals> {
    command: CaptureCommand,
    layout: OutputLayout,
    state: StateFile,
    control: P,
}

impl Launcher<UnixSignals> {
    /// Create a launcher from configuration
    pub fn new(config: &RecorderConfig) -> Self {
        Self::with_control(config, UnixSignals)
    }
}

impl<P: ProcessControl> Launcher<P> {
    /// Create a launcher with a custom process controller
    pub fn with_control(config: &RecorderConfig, control: P) -> Self {
        Self {
            command: CaptureCommand::new(config.capture.clone()),
            layout: OutputLayout::from(&config.output),
            state: StateFile::new(config.state_file.clone()),
            control,
        }
    }

    /// Start a recording to a freshly generated path
    ///
    /// Returns as soon as the process is spawned. A tracked recording that is
    /// still running is not stopped: its PID is overwritten and it can no
    /// longer be stopped through the state file.
    pub fn start(&self) -> Result<RecordingSession> {
        info!("Starting recording");

        self.warn_if_untracking();

        let started_at = Local::now();
        let output_path = self.layout.prepare(started_at.naive_local());

        info!(
            "Capture command: {}",
            self.command.command_line(&output_path)
        );

        let pid = self.command.spawn(&output_path)?;
        info!("{} started, PID={}", self.command.program(), pid);

        self.state
            .write_pid(pid)
            .context(format!("Recording PID {} for later stop", pid))?;
        info!("PID file created: {}", self.state.path().display());

        Ok(RecordingSession {
            pid,
            output_path,
            started_at,
        })
    }

    fn warn_if_untracking(&self) {
        match self.state.current() {
            Ok(Some(pid)) if self.control.is_alive(pid) => {
                warn!(
                    "Recording with PID {} is still running and will no longer be tracked",
                    pid
                );
            }
            Ok(_) => {}
            Err(e) => warn!("Ignoring unreadable state file: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_argument_vector() {
        let command = CaptureCommand::new(CaptureSettings::default());
        let args = command.args(Path::new("/rec/2024/01/01/noir_00_00_00.mp4"));
        let args: Vec<_> = args.iter().map(|a| a.to_str().unwrap()).collect();

        assert_eq!(command.program(), "libcamera-vid");
        assert_eq!(
            args,
            [
                "--camera", "1", "--codec", "libav", "--width", "1920", "--height", "1080", "-t",
                "0", "-o", "/rec/2024/01/01/noir_00_00_00.mp4",
            ]
        );
    }

    #[test]
    fn test_command_line_for_logging() {
        let command = CaptureCommand::new(CaptureSettings {
            camera: 0,
            width: 640,
            height: 480,
            ..CaptureSettings::default()
        });
        assert_eq!(
            command.command_line(Path::new("out.mp4")),
            "libcamera-vid --camera 0 --codec libav --width 640 --height 480 -t 0 -o out.mp4"
        );
    }
}
