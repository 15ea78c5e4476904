use crate::audit::metrics::CategoryMetrics;
use crate::audit::record;
use crate::gateway::RawRecord;

/// Reports count as platform-defined unless they say otherwise.
pub fn is_custom_report(report: &RawRecord) -> bool {
    !record::flag(report, "isHubSpotDefined", true)
}

pub fn extract_metrics(dashboards: &[RawRecord], reports: &[RawRecord]) -> CategoryMetrics {
    CategoryMetrics::builder()
        .count("total_dashboards", dashboards.len())
        .count("total_reports", reports.len())
        .count(
            "custom_reports",
            reports.iter().filter(|r| is_custom_report(r)).count(),
        )
        .build()
}
