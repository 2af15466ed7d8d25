//! CLI command implementations

mod config;
mod start;
mod status;
mod stop;

pub use config::{config, ConfigArgs};
pub use start::start;
pub use status::status;
pub use stop::stop;

use std::error::Error;

use noircam_core::NoircamError;
use tracing::{error, info};

/// Log a failed action with its cause chain. The CLI still exits 0.
fn log_failure(action: &str, err: &NoircamError) {
    error!("{}: {}", action, err);

    let mut source = err.source();
    while let Some(cause) = source {
        error!("  caused by: {}", cause);
        source = cause.source();
    }

    if let Some(hint) = err.user_hint() {
        info!("Hint: {}", hint);
    }
}
