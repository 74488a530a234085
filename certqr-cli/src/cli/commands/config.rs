//! `certqr config`

use std::path::Path;

use anyhow::Result;
use colored::*;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn handle_config(cmd: ConfigCommands, config: &Config, path: &Path) -> Result<()> {
    match cmd {
        ConfigCommands::Path => {
            println!("{}", path.display());
        }
        ConfigCommands::Show => {
            if !path.exists() {
                println!("{}", format!("# {} does not exist, showing defaults", path.display()).dimmed());
            }
            print!("{}", config.to_toml()?);
        }
        ConfigCommands::Init => {
            Config::write_default(path)?;
            println!("{} Wrote {}", "✓".bright_green().bold(), path.display().to_string().cyan());
        }
    }
    Ok(())
}
