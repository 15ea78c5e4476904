pub mod output;

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use super::Command;
use crate::audit::{
    enrich_results, AuditEngine, AuditResults, OfflineNarrative, Scorer, ScoringThresholds,
};
use crate::cli::OutputFormat;
use crate::config::{config, AuditConfig};
use crate::gateway::{AuditGateway, HubSpotClient, SnapshotGateway};
use output::AuditOutput;

/// Run a full audit and report it
pub struct AuditCommand {
    format: OutputFormat,
    snapshot: Option<PathBuf>,
    output: Option<PathBuf>,
    email: Option<String>,
    company: Option<String>,
    portal_id: Option<String>,
    verbose: bool,
    summary: bool,
}

impl AuditCommand {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self {
            format,
            snapshot: None,
            output: None,
            email: None,
            company: None,
            portal_id: None,
            verbose,
            summary: false,
        }
    }

    pub fn with_snapshot(mut self, snapshot: Option<PathBuf>) -> Self {
        self.snapshot = snapshot;
        self
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    pub fn with_owner(
        mut self,
        email: Option<String>,
        company: Option<String>,
        portal_id: Option<String>,
    ) -> Self {
        self.email = email;
        self.company = company;
        self.portal_id = portal_id;
        self
    }

    pub fn with_summary(mut self, summary: bool) -> Self {
        self.summary = summary;
        self
    }

    fn gateway(&self, config: &AuditConfig) -> Result<Arc<dyn AuditGateway>> {
        let gateway: Arc<dyn AuditGateway> = match &self.snapshot {
            Some(path) => {
                info!(snapshot = %path.display(), "Auditing recorded snapshot");
                Arc::new(SnapshotGateway::from_file(path)?)
            }
            None => Arc::new(HubSpotClient::new(&config.hubspot)?),
        };
        Ok(gateway)
    }

    pub async fn run(&self, config: &AuditConfig) -> Result<AuditResults> {
        let thresholds = ScoringThresholds::from_settings(&config.audit)?;
        let engine = AuditEngine::new(
            self.gateway(config)?,
            Scorer::new(Arc::new(thresholds)),
            config.audit.clone(),
        );
        let results = engine.run_full_audit().await;
        if self.summary {
            return Ok(enrich_results(results, &OfflineNarrative).await);
        }
        Ok(results)
    }

    #[cfg(feature = "database")]
    async fn persist(
        &self,
        config: &AuditConfig,
        email: &str,
        results: &AuditResults,
    ) -> Result<()> {
        let db = config
            .database
            .as_ref()
            .context("no [database] section configured")?;
        let store = crate::database::AuditStore::connect(db).await?;
        let id = store
            .store_audit(email, self.company.as_deref(), self.portal_id.as_deref(), results)
            .await?;
        store.shutdown().await;
        eprintln!("💾 Stored audit #{id} for {email}");
        Ok(())
    }

    #[cfg(not(feature = "database"))]
    async fn persist(
        &self,
        _config: &AuditConfig,
        _email: &str,
        _results: &AuditResults,
    ) -> Result<()> {
        anyhow::bail!("storing audits requires hubspot-audit to be built with the `database` feature")
    }
}

impl Command for AuditCommand {
    async fn execute(&self) -> Result<()> {
        let config = config()?;
        let results = self.run(config).await?;
        let rendered = AuditOutput::new(self.format, self.verbose).render(&results)?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, &rendered)
                    .with_context(|| format!("writing report to {}", path.display()))?;
                eprintln!("📄 Report written to {}", path.display());
            }
            None => print!("{rendered}"),
        }

        if let Some(email) = &self.email {
            self.persist(config, email, &results).await?;
        }

        Ok(())
    }
}
