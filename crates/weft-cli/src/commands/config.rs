//! `weft config` - tool-level configuration

use crate::GlobalOpts;
use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use weft_config::Config;
use weft_logger as logger;

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the current configuration
    Show,
    /// Print the config file path
    Path,
    /// Set a configuration value (output-dir, manifests-dir)
    Set { key: String, value: String },
}

pub fn handle_config(action: Option<ConfigAction>, _opts: &GlobalOpts) -> Result<()> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => show_config(),
        ConfigAction::Path => {
            println!("{}", Config::path().display());
            Ok(())
        }
        ConfigAction::Set { key, value } => set_config(&key, &value),
    }
}

fn show_config() -> Result<()> {
    let config = Config::load().context("Failed to load config")?;

    println!("Configuration: {}", Config::path().display());
    if config.is_empty() {
        println!("  (defaults: output-dir=dist, manifests-dir=manifests)");
        return Ok(());
    }
    for (key, value) in config.values_iter() {
        println!("  {} = {}", key.bold(), value);
    }
    Ok(())
}

fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load().context("Failed to load config")?;

    if !config.set(key, value.to_string()) {
        anyhow::bail!("Unknown config key '{}' (known: output-dir, manifests-dir)", key);
    }

    config.save().context("Failed to save config")?;
    logger::success(&format!("{} set to {}", key, value));
    Ok(())
}
