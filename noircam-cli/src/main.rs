//! noircam CLI
//!
//! Motion-triggered recording for libcamera cameras. Meant to be called from
//! the motion daemon's event hooks.
//!
//! # Usage
//!
//! ```bash
//! # Motion detected: start recording in the background
//! noircam start
//!
//! # Motion ended: stop the recording (SIGINT, then SIGKILL if needed)
//! noircam stop
//!
//! # Show the tracked recording
//! noircam status
//! ```

mod commands;
mod logging;

use std::ffi::OsString;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use noircam_core::{ConfigFile, RecorderConfig};
use tracing::{error, info, warn};

const USAGE: &str = "Usage: noircam [start|stop|status|config]";

/// noircam - motion-triggered libcamera recording
#[derive(Parser)]
#[command(name = "noircam")]
#[command(author = "GhostKellz")]
#[command(version)]
#[command(about = "Motion-triggered libcamera recording", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Mirror logs to stderr (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Action to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start recording in the background
    Start,

    /// Stop the current recording
    Stop,

    /// Show the tracked recording
    Status,

    /// Manage the configuration file
    Config(commands::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let parsed = Cli::try_parse_from(normalize_action(std::env::args_os()));

    let file = ConfigFile::load();
    let log_settings = file
        .as_ref()
        .map(|f| f.logging.clone())
        .unwrap_or_default();
    let verbose = parsed.as_ref().map(|cli| cli.verbose).unwrap_or(0);
    logging::init(&log_settings, verbose);

    let cli = match parsed {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let reason = e.to_string();
            let reason = reason.lines().next().unwrap_or("invalid arguments");
            error!("{}", reason);
            println!("{}", reason);
            println!("{}", USAGE);
            std::process::exit(1);
        }
    };

    let config = match file.and_then(|f| f.recorder_config()) {
        Ok(config) => config,
        Err(e) => {
            warn!("{}; using defaults", e);
            RecorderConfig::default()
        }
    };

    match cli.command {
        Commands::Start => {
            info!("Called with action: start");
            commands::start(&config).await?
        }
        Commands::Stop => {
            info!("Called with action: stop");
            commands::stop(&config).await?
        }
        Commands::Status => commands::status(&config).await?,
        Commands::Config(args) => {
            // Same contract as start/stop: report the failure, exit 0
            if let Err(e) = commands::config(args, &config).await {
                error!("Config command failed: {:#}", e);
                eprintln!("Error: {:#}", e);
            }
        }
    }

    Ok(())
}

/// Lowercase the action so `START` behaves like `start`
fn normalize_action(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    let mut args = args.into_iter();
    let mut normalized: Vec<OsString> = args.next().into_iter().collect();
    let mut seen_action = false;

    for arg in args {
        match arg.to_str() {
            Some(s) if !seen_action && !s.starts_with('-') => {
                seen_action = true;
                normalized.push(s.to_lowercase().into());
            }
            _ => normalized.push(arg),
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_action_is_lowercased() {
        assert_eq!(
            normalize_action(args(&["noircam", "-v", "STOP"])),
            args(&["noircam", "-v", "stop"])
        );
    }

    #[test]
    fn test_only_action_is_lowercased() {
        assert_eq!(
            normalize_action(args(&["noircam", "Config", "Init"])),
            args(&["noircam", "config", "Init"])
        );
    }

    #[test]
    fn test_cli_parses_actions() {
        let cli = Cli::try_parse_from(normalize_action(args(&["noircam", "Start"]))).unwrap();
        assert!(matches!(cli.command, Commands::Start));

        let cli = Cli::try_parse_from(args(&["noircam", "-vv", "stop"])).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Stop));
    }

    #[test]
    fn test_cli_rejects_unknown_and_missing_action() {
        assert!(Cli::try_parse_from(args(&["noircam", "record"])).is_err());
        assert!(Cli::try_parse_from(args(&["noircam"])).is_err());
    }
}
