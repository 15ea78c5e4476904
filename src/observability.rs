use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{info, warn};

/// HubSpot API usage counters for one process
#[derive(Debug, Default)]
pub struct GatewayApiMetrics {
    pub total_requests: AtomicU64,
    pub permission_denials: AtomicU64,
    pub errors: AtomicU64,
}

impl GatewayApiMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_permission_denied(&self, endpoint: &str) {
        self.permission_denials.fetch_add(1, Ordering::Relaxed);
        warn!(endpoint, "HubSpot API denied access (missing scope?)");
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> GatewayApiStats {
        GatewayApiStats {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            permission_denials: self.permission_denials.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }

    /// Counts recorded after `baseline` was taken
    pub fn log_stats_since(&self, baseline: &GatewayApiStats) {
        let stats = self.get_stats().since(baseline);
        info!(
            "HubSpot API metrics (this run): requests={}, permission_denials={}, errors={}",
            stats.total_requests, stats.permission_denials, stats.errors
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayApiStats {
    pub total_requests: u64,
    pub permission_denials: u64,
    pub errors: u64,
}

impl GatewayApiStats {
    pub fn since(&self, baseline: &GatewayApiStats) -> GatewayApiStats {
        GatewayApiStats {
            total_requests: self.total_requests.saturating_sub(baseline.total_requests),
            permission_denials: self
                .permission_denials
                .saturating_sub(baseline.permission_denials),
            errors: self.errors.saturating_sub(baseline.errors),
        }
    }
}

static GATEWAY_METRICS: std::sync::LazyLock<GatewayApiMetrics> =
    std::sync::LazyLock::new(GatewayApiMetrics::new);

pub fn gateway_metrics() -> &'static GatewayApiMetrics {
    &GATEWAY_METRICS
}

/// Time an operation and log its duration when finished
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn finish(self) -> u128 {
        let duration_ms = self.start.elapsed().as_millis();
        info!(
            operation = %self.operation,
            duration_ms,
            "Operation completed"
        );
        duration_ms
    }
}
