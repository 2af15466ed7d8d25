//! Configuration file loading
//!
//! Loads user configuration from `~/.config/noircam/config.toml`, or from the
//! path in `NOIRCAM_CONFIG` when set.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use super::{
    default_log_file, default_state_file, CaptureSettings, OutputSettings, RecorderConfig, Timing,
};
use crate::error::{NoircamError, Result};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "NOIRCAM_CONFIG";

/// Configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Capture program settings
    #[serde(default)]
    pub capture: CaptureSettings,

    /// Output layout
    #[serde(default)]
    pub output: OutputSettings,

    /// State file settings
    #[serde(default)]
    pub state: StateSettings,

    /// Log file settings
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Stop sequence timings
    #[serde(default)]
    pub timing: TimingSettings,
}

/// State file settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSettings {
    /// File holding the PID of the running capture process
    #[serde(default = "default_state_file")]
    pub pid_file: PathBuf,
}

/// Log file settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log file, opened in append mode
    #[serde(default = "default_log_file")]
    pub file: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_level")]
    pub level: String,
}

/// Stop sequence timings in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingSettings {
    /// Delay before sending the interrupt
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Delay between the interrupt and the liveness check
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_settle_delay_ms() -> u64 {
    2000
}

fn default_shutdown_grace_ms() -> u64 {
    3000
}

impl Default for StateSettings {
    fn default() -> Self {
        Self {
            pid_file: default_state_file(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            level: default_level(),
        }
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

impl From<&TimingSettings> for Timing {
    fn from(settings: &TimingSettings) -> Self {
        Self {
            settle_delay: Duration::from_millis(settings.settle_delay_ms),
            shutdown_grace: Duration::from_millis(settings.shutdown_grace_ms),
        }
    }
}

impl ConfigFile {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            PathBuf::from(path)
        } else if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("noircam").join("config.toml")
        } else if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("noircam")
                .join("config.toml")
        } else {
            PathBuf::from("/etc/noircam/config.toml")
        }
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    /// Load configuration from a specific path
    ///
    /// A missing file yields the defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| NoircamError::Config(format!("Failed to read config file: {}", e)))?;

        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| NoircamError::Config(format!("Failed to parse config file: {}", e)))?;

        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    NoircamError::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| NoircamError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| NoircamError::Config(format!("Failed to write config file: {}", e)))?;

        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Build the validated runtime configuration
    pub fn recorder_config(&self) -> Result<RecorderConfig> {
        let config = RecorderConfig {
            capture: self.capture.clone(),
            output: self.output.clone(),
            state_file: self.state.pid_file.clone(),
            timing: Timing::from(&self.timing),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Generate a sample configuration file
pub fn sample_config() -> String {
    r#"# noircam Configuration
# https://github.com/ghostkellz/noircam

[capture]
# Capture program, invoked as:
#   <program> --camera <camera> --codec <codec> --width <width> --height <height> -t 0 -o <file>
program = "libcamera-vid"

# Camera index
camera = 1

# Codec selector ("libav" writes MP4 directly)
codec = "libav"

# Resolution
width = 1920
height = 1080

[output]
# Recordings are written to <root>/<YYYY>/<MM>/<DD>/<prefix>_HH_MM_SS.<extension>
root = "/var/www/html/motion"
prefix = "noir"
extension = "mp4"

[state]
# File holding the PID of the running recording
# (default: $XDG_RUNTIME_DIR/noircam.pid, or /tmp/noircam-<uid>.pid)
# pid_file = "/tmp/noir_libcamera.pid"

[logging]
# Log file, appended to on every run
# (default: ~/.local/state/noircam/noircam.log)
# file = "/var/log/noircam/noircam.log"

# Log level: error, warn, info, debug, trace
level = "info"

[timing]
# Wait after motion ends before interrupting the recording
settle_delay_ms = 2000

# Wait after the interrupt before force-killing a recording that is still running
shutdown_grace_ms = 3000
"#
    .to_string()
}
