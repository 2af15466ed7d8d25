//! Config command - inspect and create the configuration file

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use noircam_core::config::{sample_config, ConfigFile, CONFIG_ENV};
use noircam_core::RecorderConfig;

/// Arguments for the config command
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the path to the config file
    Path,

    /// Show the effective configuration
    Show,

    /// Write a sample config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print a sample configuration to stdout
    Sample,
}

/// Run config subcommand
pub async fn config(args: ConfigArgs, effective: &RecorderConfig) -> Result<()> {
    let path = ConfigFile::default_path();

    match args.command {
        ConfigCommand::Path => {
            println!("{}", path.display());
            if std::env::var_os(CONFIG_ENV).is_some() {
                println!("(from {})", CONFIG_ENV);
            }
            if path.exists() {
                println!("(file exists)");
            } else {
                println!("(file does not exist, defaults are used)");
            }
        }
        ConfigCommand::Show => {
            if path.exists() {
                println!("Configuration file: {}\n", path.display());
            } else {
                println!("No configuration file at {}, using defaults.\n", path.display());
            }

            let capture = &effective.capture;
            println!("Capture:");
            println!("  Program:    {}", capture.program);
            println!("  Camera:     {}", capture.camera);
            println!("  Codec:      {}", capture.codec);
            println!("  Resolution: {}x{}", capture.width, capture.height);
            println!();
            println!("Output:");
            println!(
                "  Files:      {}/YYYY/MM/DD/{}_HH_MM_SS.{}",
                effective.output.root.display(),
                effective.output.prefix,
                effective.output.extension
            );
            println!("  State file: {}", effective.state_file.display());
            println!();
            println!("Stop timing:");
            println!("  Settle delay:   {:?}", effective.timing.settle_delay);
            println!("  Shutdown grace: {:?}", effective.timing.shutdown_grace);
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                println!("Configuration file already exists: {}", path.display());
                println!();
                println!("Use --force to overwrite, or edit the existing file.");
                return Ok(());
            }

            if let Some(parent) = path.parent() {
                if !parent.exists() {
                    std::fs::create_dir_all(parent).context("Failed to create config directory")?;
                }
            }

            std::fs::write(&path, sample_config()).context("Failed to write config file")?;

            println!("Created configuration file: {}", path.display());
        }
        ConfigCommand::Sample => {
            print!("{}", sample_config());
        }
    }

    Ok(())
}
