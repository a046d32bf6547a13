//! `happy config` subcommands

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use happy_core::HappyConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a config file with the default values
    Init(InitArgs),
    /// Show the effective config (file + environment overrides)
    Show,
    /// Show config file path
    Path,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

pub fn run_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Init(args) => run_init(args),
        ConfigCommands::Show => run_show(),
        ConfigCommands::Path => run_path(),
    }
}

fn run_init(args: InitArgs) -> Result<()> {
    let config_path = HappyConfig::config_path();

    if config_path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            config_path
        ));
    }

    HappyConfig::default()
        .save_to(&config_path)
        .context("Failed to write default config")?;

    println!("✅ Created config at: {:?}", config_path);
    println!("\nNext steps:");
    println!("  1. Edit the config: $EDITOR {:?}", config_path);
    println!("  2. Point api.base_url at your Happy API");
    println!("  3. Run: happy create");

    Ok(())
}

fn run_show() -> Result<()> {
    let config = HappyConfig::load()?;
    print!("{}", config.to_toml()?);
    Ok(())
}

fn run_path() -> Result<()> {
    println!("{}", HappyConfig::config_path().display());
    Ok(())
}
