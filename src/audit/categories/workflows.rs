use serde_json::json;

use crate::audit::metrics::{percentage_of, CategoryMetrics, SampleRecord};
use crate::audit::record;
use crate::gateway::RawRecord;

/// Name fragments that usually mark a throwaway or duplicated workflow
pub const REDUNDANT_MARKERS: &[&str] = &["test", "backup", "copy", "old", "temp"];

/// Name-based guess only. "Holdout campaign" matches `old` too.
pub fn looks_redundant(workflow: &RawRecord) -> bool {
    let name = record::text(workflow, "name").to_lowercase();
    REDUNDANT_MARKERS.iter().any(|marker| name.contains(marker))
}

fn sample(workflow: &RawRecord) -> SampleRecord {
    SampleRecord::from([
        (
            "name".to_string(),
            json!(record::text_or(workflow, &["name"], "Unnamed workflow")),
        ),
        (
            "id".to_string(),
            json!(record::identifier(workflow, &["id", "flowId"])),
        ),
        (
            "active".to_string(),
            json!(record::workflow_is_active(workflow)),
        ),
    ])
}

pub fn extract_metrics(workflows: &[RawRecord], sample_limit: usize) -> CategoryMetrics {
    let (active, inactive): (Vec<&RawRecord>, Vec<&RawRecord>) = workflows
        .iter()
        .partition(|workflow| record::workflow_is_active(workflow));

    let redundant: Vec<&RawRecord> = workflows.iter().filter(|w| looks_redundant(w)).collect();

    CategoryMetrics::builder()
        .count("total_workflows", workflows.len())
        .count("active_workflows", active.len())
        .count("inactive_workflows", inactive.len())
        .percentage(
            "inactive_percentage",
            percentage_of(inactive.len(), workflows.len()),
        )
        .count("potentially_redundant", redundant.len())
        .samples(
            "redundant_workflows_sample",
            redundant.iter().take(sample_limit).map(|w| sample(w)).collect(),
        )
        .samples(
            "inactive_workflows_sample",
            inactive.iter().take(sample_limit).map(|w| sample(w)).collect(),
        )
        .build()
}
