mod config_cmd;
mod replay;
mod thresholds;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

pub use replay::ReplayCommand;
pub use thresholds::ThresholdsCommand;

#[derive(Parser)]
#[command(name = "rep-coach")]
#[command(about = "Count exercise repetitions from recorded pose landmarks", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "REP_COACH_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines pose recording and report events
    Replay(ReplayCommand),

    /// Show the effective thresholds for an exercise
    Thresholds(ThresholdsCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub async fn execute(self) -> Result<()> {
        let config_path = self.config.as_deref();

        match self.command {
            Commands::Replay(cmd) => {
                let config = Config::load(config_path)?;
                cmd.execute(&config).await
            }
            Commands::Thresholds(cmd) => {
                let config = Config::load(config_path)?;
                cmd.execute(&config)
            }
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config(config_path),
                ConfigSubcommands::Init { force } => config_cmd::init_config(config_path, force),
            },
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

/// Parse a `key=value` threshold override
pub(crate) fn parse_threshold(raw: &str) -> Result<(String, f32), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing threshold name in '{}'", raw));
    }
    let value = value
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("invalid value for {}: {}", key, e))?;
    Ok((key.to_string(), value))
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
