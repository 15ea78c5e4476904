use serde_json::json;

use crate::audit::consolidation::{common_fields, field_usage};
use crate::audit::metrics::{percentage_of, CategoryMetrics, SampleRecord};
use crate::audit::record;
use crate::gateway::RawRecord;

/// Submission count for one sampled form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormActivity {
    pub form_id: String,
    pub submissions: u64,
}

pub fn form_id(form: &RawRecord) -> Option<String> {
    record::identifier(form, &["guid", "id"])
}

/// Ids of the first `sample_size` forms, in received order.
///
/// A form without any identifier cannot be looked up. It still takes its
/// slot, so the sample never reaches past the first `sample_size` forms.
pub fn sample_ids(forms: &[RawRecord], sample_size: usize) -> Vec<String> {
    forms.iter().take(sample_size).filter_map(form_id).collect()
}

/// `activity` holds only the forms whose submissions could be fetched.
pub fn extract_metrics(
    forms: &[RawRecord],
    activity: &[FormActivity],
    sample_limit: usize,
) -> CategoryMetrics {
    let embedded = forms
        .iter()
        .filter(|form| record::flag(form, "isPublished", false))
        .count();
    let unembedded = forms.len() - embedded;

    let with_submissions = activity.iter().filter(|a| a.submissions > 0).count();
    let unused = activity.len() - with_submissions;

    let common = common_fields(&field_usage(forms), forms.len());
    let common_sample: Vec<SampleRecord> = common
        .iter()
        .take(sample_limit)
        .map(|(field, used_by)| {
            SampleRecord::from([
                ("name".to_string(), json!(field.name)),
                ("field_type".to_string(), json!(field.field_type)),
                ("forms".to_string(), json!(used_by)),
            ])
        })
        .collect();

    CategoryMetrics::builder()
        .count("total_forms", forms.len())
        .count("embedded_forms", embedded)
        .count("unembedded_forms", unembedded)
        .percentage(
            "unembedded_percentage",
            percentage_of(unembedded, forms.len()),
        )
        .count("sampled_forms", activity.len())
        .count("forms_with_submissions", with_submissions)
        .percentage(
            "unused_forms_percentage",
            percentage_of(unused, activity.len()),
        )
        .count("common_fields_count", common.len())
        .samples("common_fields_sample", common_sample)
        .build()
}
