//! Configuration management CLI commands.
//!
//! Provides `config path`, `config show`, `config init`, `config get` and
//! `config set` for viewing and modifying settings from the command line.

use std::path::PathBuf;

use clap::Subcommand;
use bagmosaic::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// List all configuration settings
    Show,

    /// Write a configuration file with the current settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., pipeline.threads)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., pipeline.threads)
        key: String,

        /// Value to set
        value: String,
    },
}

/// Run a config subcommand against the file at `path` (or the default one).
pub fn run(
    command: ConfigCommands,
    config: ConfigFile,
    path: Option<PathBuf>,
) -> Result<(), CliError> {
    let path = path.unwrap_or_else(config_file_path);

    match command {
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommands::Show => {
            print!("{}", render(&config));
            Ok(())
        }
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::Config(format!(
                    "{} already exists. Use --force to overwrite it.",
                    path.display()
                )));
            }
            config.save_to(&path)?;
            println!("Configuration file: {}", path.display());
            println!("CLI arguments override config file values when specified.");
            Ok(())
        }
        ConfigCommands::Get { key } => {
            let value = parse_key(&key)?.get(&config);
            if value.is_empty() {
                println!("(not set)");
            } else {
                println!("{}", value);
            }
            Ok(())
        }
        ConfigCommands::Set { key, value } => {
            let config_key = parse_key(&key)?;
            let mut config = config;
            config_key.set(&mut config, &value)?;
            config.save_to(&path)?;
            println!("Set {} = {}", config_key, value);
            Ok(())
        }
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'bagmosaic config show' to see available keys.",
            key
        ))
    })
}

/// All settings grouped by section.
fn render(config: &ConfigFile) -> String {
    let mut out = String::new();
    let mut current_section = "";

    for key in ConfigKey::all() {
        let section = key.section();

        // Section header when the section changes
        if section != current_section {
            if !current_section.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("[{}]\n", section));
            current_section = section;
        }

        let value = key.get(config);
        if value.is_empty() {
            out.push_str(&format!("  {} = (not set)\n", key.key_name()));
        } else {
            out.push_str(&format!("  {} = {}\n", key.key_name(), value));
        }
    }

    out
}
