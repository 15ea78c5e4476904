use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::config::ObservabilityConfig;

/// Initialize tracing output.
///
/// `RUST_LOG` wins over the configured level. JSON output carries the current
/// span so each line can be tied back to its audit run and category.
pub fn init_telemetry(settings: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))?;

    if settings.json_logs {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .try_init()?;
    }

    tracing::debug!("HubSpot audit telemetry initialized");
    Ok(())
}

/// Generate an identifier linking every log line of one audit run
pub fn generate_run_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn create_audit_span(run_id: &str) -> tracing::Span {
    tracing::info_span!("audit_run", run.id = run_id, otel.kind = "internal")
}

pub fn create_category_span(category: &str, run_id: &str) -> tracing::Span {
    tracing::info_span!(
        "audit_category",
        category = category,
        run.id = run_id,
        otel.kind = "internal"
    )
}
