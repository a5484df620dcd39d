//! Configuration commands.

use clap::Subcommand;
use daybrief_core::storage::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the resolved configuration as TOML
    Show,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
