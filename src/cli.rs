use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::usecases::bootstrap::ConfigOverrides;

#[derive(Debug, Parser)]
#[command(name = "pmchat", about = "Terminal client for a private-messaging chat server")]
pub struct Cli {
    /// Path to config file (default: ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Chat server base URL, e.g. http://127.0.0.1:5000
    #[arg(short, long, global = true)]
    pub server: Option<String>,

    /// Username to log in with
    #[arg(short, long, global = true)]
    pub username: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start TUI shell
    Run,
}

impl Cli {
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }

    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            server: self.server.clone(),
            username: self.username.clone(),
        }
    }
}
