//! Configuration types for noircam
//!
//! Runtime configuration for the capture program, output layout, state file
//! and stop timings. Every component receives its settings from here instead
//! of reading process-wide globals.

mod file;

pub use file::{
    sample_config, ConfigFile, LoggingSettings, StateSettings, TimingSettings, CONFIG_ENV,
};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{NoircamError, Result};

/// Default capture program
pub const DEFAULT_PROGRAM: &str = "libcamera-vid";

/// Default output root served by the web UI
pub const DEFAULT_OUTPUT_ROOT: &str = "/var/www/html/motion";

/// Settings for the external capture program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSettings {
    /// Program name or path
    #[serde(default = "default_program")]
    pub program: String,

    /// Camera index (`--camera`)
    #[serde(default = "default_camera")]
    pub camera: u32,

    /// Codec selector (`--codec`)
    #[serde(default = "default_codec")]
    pub codec: String,

    /// Frame width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Frame height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
}

/// Where recordings land and how they are named
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Root directory; recordings go under `<root>/<YYYY>/<MM>/<DD>/`
    #[serde(default = "default_output_root")]
    pub root: PathBuf,

    /// File name prefix (`<prefix>_HH_MM_SS`)
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// File extension without the dot
    #[serde(default = "default_extension")]
    pub extension: String,
}

/// Delays used by the stop sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Wait before interrupting, so a motion event in flight can finish
    pub settle_delay: Duration,
    /// Wait after interrupting before checking whether escalation is needed
    pub shutdown_grace: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_secs(2),
            shutdown_grace: Duration::from_secs(3),
        }
    }
}

impl Timing {
    /// Total time the stop sequence sleeps when the process is alive
    pub fn total(&self) -> Duration {
        self.settle_delay + self.shutdown_grace
    }
}

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

fn default_camera() -> u32 {
    1
}

fn default_codec() -> String {
    "libav".to_string()
}

fn default_width() -> u32 {
    1920
}

fn default_height() -> u32 {
    1080
}

fn default_output_root() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_ROOT)
}

fn default_prefix() -> String {
    "noir".to_string()
}

fn default_extension() -> String {
    "mp4".to_string()
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            program: default_program(),
            camera: default_camera(),
            codec: default_codec(),
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            root: default_output_root(),
            prefix: default_prefix(),
            extension: default_extension(),
        }
    }
}

/// Get the default state (PID) file path
///
/// Uses XDG_RUNTIME_DIR if available, otherwise /tmp
pub fn default_state_file() -> PathBuf {
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        PathBuf::from(runtime_dir).join("noircam.pid")
    } else {
        // Fallback to /tmp with user-specific name
        // SAFETY: libc::getuid() is a simple syscall that returns the real user ID.
        // It has no preconditions and cannot fail (always returns a valid uid_t).
        let uid = unsafe { libc::getuid() };
        PathBuf::from(format!("/tmp/noircam-{}.pid", uid))
    }
}

/// Get the default log file path
pub fn default_log_file() -> PathBuf {
    match dirs::state_dir() {
        Some(dir) => dir.join("noircam").join("noircam.log"),
        None => PathBuf::from("logs").join("noircam.log"),
    }
}

/// Complete recorder configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderConfig {
    /// Capture program settings
    pub capture: CaptureSettings,
    /// Output layout
    pub output: OutputSettings,
    /// State file holding the PID of the running capture process
    pub state_file: PathBuf,
    /// Stop sequence delays
    pub timing: Timing,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            capture: CaptureSettings::default(),
            output: OutputSettings::default(),
            state_file: default_state_file(),
            timing: Timing::default(),
        }
    }
}

impl RecorderConfig {
    /// Set the capture program
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.capture.program = program.into();
        self
    }

    /// Set the output root directory
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output.root = root.into();
        self
    }

    /// Set the state file path
    pub fn with_state_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_file = path.into();
        self
    }

    /// Set the stop sequence delays
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Validate and return an error if the configuration cannot work
    pub fn validate(&self) -> Result<()> {
        if self.capture.program.trim().is_empty() {
            return Err(NoircamError::config("capture.program cannot be empty"));
        }

        if self.capture.width == 0 || self.capture.height == 0 {
            return Err(NoircamError::config(format!(
                "Resolution {}x{} cannot be zero",
                self.capture.width, self.capture.height
            )));
        }

        if self.output.prefix.is_empty() {
            return Err(NoircamError::config("output.prefix cannot be empty"));
        }

        if self.output.prefix.contains(std::path::MAIN_SEPARATOR) || self.output.prefix.contains('/')
        {
            return Err(NoircamError::config(format!(
                "output.prefix '{}' must not contain path separators",
                self.output.prefix
            )));
        }

        if self.output.extension.is_empty() || self.output.extension.starts_with('.') {
            return Err(NoircamError::config(format!(
                "output.extension '{}' must be non-empty and without a leading dot",
                self.output.extension
            )));
        }

        if self.state_file.as_os_str().is_empty() {
            return Err(NoircamError::config("state.pid_file cannot be empty"));
        }

        Ok(())
    }
}
