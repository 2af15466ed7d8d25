//! Log setup
//!
//! Everything goes to an append-only log file. `-v` mirrors it to stderr;
//! stderr is also used when the log file cannot be opened.

use std::path::Path;

use noircam_core::config::LoggingSettings;
use tracing::warn;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber. Call once, before any other logging.
pub fn init(settings: &LoggingSettings, verbose: u8) {
    let level = match verbose {
        0 => settings.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("noircam={level},noircam_core={level}")))
        .unwrap_or_else(|_| EnvFilter::new("noircam=info,noircam_core=info"));

    let (file_layer, file_error) = match open_log_file(&settings.file) {
        Ok(appender) => {
            let layer = fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), None)
        }
        Err(e) => (None, Some(e)),
    };

    let stderr_layer = (verbose > 0 || file_error.is_some()).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    if let Some(e) = file_error {
        warn!(
            "Cannot open log file {}: {}; logging to stderr",
            settings.file.display(),
            e
        );
    }
}

fn open_log_file(path: &Path) -> Result<RollingFileAppender, String> {
    let name = path
        .file_name()
        .ok_or_else(|| "log file path has no file name".to_string())?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    std::fs::create_dir_all(dir).map_err(|e| e.to_string())?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy())
        .build(dir)
        .map_err(|e| e.to_string())
}
