use anyhow::Result;

use super::Command;
use crate::config::config;

/// Print the effective configuration, token masked
pub struct ConfigCommand;

impl Command for ConfigCommand {
    async fn execute(&self) -> Result<()> {
        let effective = config()?.redacted();
        println!("⚙️  Effective configuration (defaults < hubspot-audit.toml < .hubspot-audit-rc < HUBSPOT_AUDIT__*)");
        println!();
        print!("{}", toml::to_string_pretty(&effective)?);
        Ok(())
    }
}
