use anyhow::{bail, Result};

use crate::cli::ConfigCommands;
use crate::config::MaduveConfig;

/// Runs without a backend connection or session.
pub struct ConfigCommand {
    pub action: ConfigCommands,
}

impl ConfigCommand {
    pub fn execute(&self, config: &MaduveConfig) -> Result<()> {
        match &self.action {
            ConfigCommands::Init { path, force } => {
                if path.exists() && !force {
                    bail!(
                        "{} already exists. Use --force to overwrite it.",
                        path.display()
                    );
                }
                config.save_to_file(path)?;
                println!("✅ Wrote configuration to {}", path.display());
                println!("💡 Environment variables such as MADUVE_API__BASE_URL still override the file");
            }
            ConfigCommands::Show => {
                print!("{}", toml::to_string_pretty(config)?);
            }
        }
        Ok(())
    }
}
