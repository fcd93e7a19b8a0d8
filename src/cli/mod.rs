pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "ceialmilk")]
#[command(about = "CeialMilk admin CLI - database migrations and user management")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply pending database migrations")]
    Migrate,

    #[command(about = "Login user management")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = AppConfig::from_env()?;

    match cli.command {
        Commands::Migrate => commands::migrate::handle(&config, output_format).await,
        Commands::User { cmd } => commands::user::handle(cmd, &config, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_user_create() {
        let cli = Cli::try_parse_from([
            "ceialmilk",
            "--json",
            "user",
            "create",
            "--nome",
            "Admin",
            "--email",
            "admin@ceialmilk.com",
            "--password",
            "password",
            "--perfil",
            "ADMIN",
        ])
        .unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::User { .. }));
    }

    #[test]
    fn parses_migrate() {
        let cli = Cli::try_parse_from(["ceialmilk", "migrate"]).unwrap();
        assert!(matches!(cli.command, Commands::Migrate));
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Text));
    }
}
