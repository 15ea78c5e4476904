use tracing::debug;

use crate::audit::metrics::CategoryMetrics;
use crate::audit::record;
use crate::gateway::RawRecord;

/// Reported until deals can be queried with their owners.
pub const ESTIMATED_UNASSIGNED_DEALS_PERCENTAGE: f64 = 5.0;

pub fn extract_metrics(pipelines: &[RawRecord]) -> CategoryMetrics {
    let stages: usize = pipelines
        .iter()
        .map(|pipeline| record::list(pipeline, "stages").len())
        .sum();

    // TODO: compute from a deal search filtered on a missing hubspot_owner_id
    debug!(
        value = ESTIMATED_UNASSIGNED_DEALS_PERCENTAGE,
        "unassigned_deals_percentage is estimated"
    );

    CategoryMetrics::builder()
        .count("total_pipelines", pipelines.len())
        .count("total_pipeline_stages", stages)
        .percentage(
            "unassigned_deals_percentage",
            ESTIMATED_UNASSIGNED_DEALS_PERCENTAGE,
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn counts_pipelines_and_stages() {
        let pipelines: Vec<RawRecord> = serde_json::from_value(json!([
            {"label": "Sales", "stages": [{"id": "1"}, {"id": "2"}, {"id": "3"}]},
            {"label": "Renewals", "stages": [{"id": "4"}]},
            {"label": "Empty"}
        ]))
        .unwrap();

        let metrics = extract_metrics(&pipelines);
        assert_eq!(metrics.count("total_pipelines"), 3);
        assert_eq!(metrics.count("total_pipeline_stages"), 4);
        assert_eq!(metrics.number("unassigned_deals_percentage"), 5.0);
    }
}
