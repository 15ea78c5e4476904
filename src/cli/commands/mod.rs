use anyhow::Result;

pub mod audit;
pub mod config;
pub mod history;
pub mod thresholds;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

pub async fn show_how_to_start() -> Result<()> {
    println!("📋 hubspot-audit - HubSpot portal health check");
    println!();
    println!("To get started:");
    println!("  🔑 export HUBSPOT_ACCESS_TOKEN=...   # private app token");
    println!("  🩺 hubspot-audit audit               # Audit the portal");
    println!("  📏 hubspot-audit thresholds          # Show scoring tiers");
    println!("  ⚙️  hubspot-audit config              # Show effective configuration");
    println!();
    println!("💡 Try 'hubspot-audit audit --snapshot portal.json' to audit recorded data offline.");
    Ok(())
}
