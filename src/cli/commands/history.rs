use anyhow::Result;

use super::Command;
use crate::cli::OutputFormat;

/// List stored audits for one e-mail address
pub struct HistoryCommand {
    email: String,
    limit: u32,
    format: OutputFormat,
}

impl HistoryCommand {
    pub fn new(email: String, limit: u32, format: OutputFormat) -> Self {
        Self {
            email,
            limit,
            format,
        }
    }
}

impl Command for HistoryCommand {
    #[cfg(feature = "database")]
    async fn execute(&self) -> Result<()> {
        use anyhow::Context;
        use crate::config::config;
        use crate::database::AuditStore;

        let db = config()?
            .database
            .as_ref()
            .context("no [database] section configured")?;
        let store = AuditStore::connect(db).await?;
        let audits = store.audit_history(&self.email, self.limit).await?;
        store.shutdown().await;

        match self.format {
            OutputFormat::Json => {
                let rows: Vec<serde_json::Value> = audits
                    .iter()
                    .map(|audit| {
                        serde_json::json!({
                            "id": audit.id,
                            "email": audit.email,
                            "company_name": audit.company_name,
                            "portal_id": audit.portal_id,
                            "audit_timestamp": audit.audit_timestamp.to_rfc3339(),
                            "results": audit.results,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            }
            OutputFormat::Text => {
                if audits.is_empty() {
                    println!("📋 No stored audits for {}", self.email);
                    return Ok(());
                }
                println!("📋 Audit history for {}", self.email);
                println!();
                for audit in &audits {
                    println!(
                        "#{:<5} {}  {:.1}  {}  {}",
                        audit.id,
                        audit.audit_timestamp.format("%Y-%m-%d %H:%M"),
                        audit.overall_score,
                        audit.overall_grade,
                        audit.company_name.as_deref().unwrap_or("-")
                    );
                }
            }
        }
        Ok(())
    }

    #[cfg(not(feature = "database"))]
    async fn execute(&self) -> Result<()> {
        let _ = (&self.email, self.limit, self.format);
        anyhow::bail!("audit history requires hubspot-audit to be built with the `database` feature")
    }
}
