//! Config command - show or change the backend URL

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use ebank_core::config::{Config, API_URL_ENV};

use super::get_ebank_dir;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Set the backend base URL
    SetUrl {
        /// e.g. https://ebank.example.ma/api
        url: String,
    },
    /// Go back to the default backend URL
    ResetUrl,
}

pub fn run(command: Option<ConfigCommands>) -> Result<()> {
    let ebank_dir = get_ebank_dir()?;
    std::fs::create_dir_all(&ebank_dir)?;
    let mut config = Config::load(&ebank_dir)?;

    match command.unwrap_or(ConfigCommands::Show) {
        ConfigCommands::Show => {
            println!("{} {}", "Backend:".bold(), config.api_url);
            println!("{} {}", "Répertoire:".bold(), ebank_dir.display());
            if std::env::var(API_URL_ENV).is_ok() {
                println!("{}", format!("(URL imposée par {})", API_URL_ENV).dimmed());
            }
        }
        ConfigCommands::SetUrl { url } => {
            config.set_api_url(&url)?;
            config.save(&ebank_dir)?;
            output::success(&format!("Backend: {}", config.api_url));
        }
        ConfigCommands::ResetUrl => {
            config.reset_api_url();
            config.save(&ebank_dir)?;
            output::success(&format!("Backend: {}", config.api_url));
        }
    }
    Ok(())
}
