//! Output path generation
//!
//! Recordings are grouped by day and named by time of day:
//!
//! ```text
//! <root>/<YYYY>/<MM>/<DD>/<prefix>_<HH>_<MM>_<SS>.<ext>
//! ```
//!
//! Resolution is one second, so two recordings started within the same
//! second get the same path.

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::config::OutputSettings;

/// Maps timestamps to recording paths
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
    prefix: String,
    extension: String,
}

impl OutputLayout {
    /// Create a layout rooted at `root`
    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
            extension: extension.into(),
        }
    }

    /// Root directory recordings are written under
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Day directory for `at`
    pub fn dir_for(&self, at: NaiveDateTime) -> PathBuf {
        self.root
            .join(at.format("%Y").to_string())
            .join(at.format("%m").to_string())
            .join(at.format("%d").to_string())
    }

    /// Full recording path for `at`, without touching the filesystem
    pub fn path_for(&self, at: NaiveDateTime) -> PathBuf {
        let file_name = format!(
            "{}_{}.{}",
            self.prefix,
            at.format("%H_%M_%S"),
            self.extension
        );
        self.dir_for(at).join(file_name)
    }

    /// Recording path for `at`, creating the day directory if needed
    ///
    /// A directory that cannot be created is logged and the path is returned
    /// anyway; the capture program will report the failure itself.
    pub fn prepare(&self, at: NaiveDateTime) -> PathBuf {
        let dir = self.dir_for(at);
        match std::fs::create_dir_all(&dir) {
            Ok(()) => info!("Ensured directory exists: {}", dir.display()),
            Err(e) => error!(error = %e, "Failed to create directories: {}", dir.display()),
        }

        let path = self.path_for(at);
        info!("Generated output file path: {}", path.display());
        path
    }
}

impl From<&OutputSettings> for OutputLayout {
    fn from(settings: &OutputSettings) -> Self {
        Self::new(
            settings.root.clone(),
            settings.prefix.clone(),
            settings.extension.clone(),
        )
    }
}
