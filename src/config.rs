use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for the HubSpot audit
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuditConfig {
    /// HubSpot API access
    pub hubspot: HubSpotConfig,
    /// Audit run tuning
    pub audit: AuditSettings,
    /// Logging settings
    pub observability: ObservabilityConfig,
    /// Audit history storage (optional)
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HubSpotConfig {
    /// Private app or OAuth access token (can be set via env var)
    pub access_token: Option<String>,
    /// API root, overridable for testing against a mock server
    pub base_url: String,
    /// Per-request timeout
    pub timeout_seconds: u64,
    /// Rate limiting settings
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Sustained requests per second
    pub requests_per_second: u32,
    /// Burst capacity
    pub burst_capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AuditSettings {
    /// How many forms (first N, in API order) get their submissions counted
    pub forms_sample_size: usize,
    /// Trailing window for submission counts
    pub submission_window_days: u32,
    /// Cap for sampled detail lists kept in metrics
    pub sample_limit: usize,
    /// Optional TOML file replacing the built-in scoring thresholds
    pub thresholds_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (overridden by RUST_LOG)
    pub log_level: String,
    /// Emit JSON log lines instead of the compact format
    pub json_logs: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database URL (SQLite file path or connection string)
    pub url: String,
    /// Maximum connections in pool
    pub max_connections: u32,
    /// Enable automatic migrations
    pub auto_migrate: bool,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            forms_sample_size: 10,
            submission_window_days: 30,
            sample_limit: 5,
            thresholds_path: None,
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json_logs: false,
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            hubspot: HubSpotConfig {
                access_token: None, // Will be read from env var or .hubspot-audit-rc
                base_url: "https://api.hubapi.com".to_string(),
                timeout_seconds: 30,
                rate_limit: RateLimitConfig {
                    // HubSpot private apps allow 100 requests per 10 seconds
                    requests_per_second: 8,
                    burst_capacity: 20,
                },
            },
            audit: AuditSettings::default(),
            observability: ObservabilityConfig::default(),
            database: Some(DatabaseConfig {
                url: "sqlite://.hubspot-audit/audits.db".to_string(),
                max_connections: 5,
                auto_migrate: true,
            }),
        }
    }
}

impl AuditConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (hubspot-audit.toml, .hubspot-audit-rc)
    /// 3. Environment variables (prefixed with HUBSPOT_AUDIT__)
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&AuditConfig::default())?);

        if Path::new("hubspot-audit.toml").exists() {
            builder = builder.add_source(File::with_name("hubspot-audit"));
        }

        if Path::new(".hubspot-audit-rc").exists() {
            builder = builder.add_source(
                File::with_name(".hubspot-audit-rc").format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("HUBSPOT_AUDIT")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let mut audit_config: AuditConfig = builder.build()?.try_deserialize()?;

        if audit_config.hubspot.access_token.is_none() {
            audit_config.hubspot.access_token = ["HUBSPOT_ACCESS_TOKEN", "HUBSPOT_AUDIT_TOKEN"]
                .iter()
                .find_map(|name| std::env::var(name).ok())
                .filter(|token| !token.trim().is_empty());
        }

        Ok(audit_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Copy safe to print: the access token is masked
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if let Some(token) = copy.hubspot.access_token.as_mut() {
            let visible: String = token.chars().take(4).collect();
            *token = format!("{visible}…");
        }
        copy
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<AuditConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = AuditConfig::load_env_file();
        AuditConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static AuditConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<&'static AuditConfig> {
    let loaded = config()?;
    tracing::debug!("Configuration loaded successfully");
    Ok(loaded)
}
