//! Naive redundancy heuristics.
//!
//! These are approximations over names and field shapes. They do not know
//! how properties or form fields are actually used, and the suggestions they
//! produce are worded as things to review.

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::gateway::RawRecord;

use super::record;

pub const MAX_SUGGESTIONS: usize = 3;

/// Number of leading `_` tokens that define a property family
const PREFIX_TOKENS: usize = 3;
const ASSESSMENT_PREFIX: &str = "a_";
const ASSESSMENT_THRESHOLD: usize = 10;
/// Forms a property must appear on to count as high value
pub const HIGH_VALUE_MIN_FORMS: usize = 3;

/// Consolidation suggestions for custom property names, at most [`MAX_SUGGESTIONS`].
pub fn property_suggestions<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let names: BTreeSet<&str> = names.into_iter().filter(|n| !n.is_empty()).collect();
    let mut suggestions = Vec::new();

    let mut families: Vec<(String, usize)> = prefix_families(&names)
        .into_iter()
        .filter(|(_, members)| *members > 1)
        .collect();
    families.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    suggestions.extend(families.into_iter().map(|(prefix, members)| {
        format!("Consider consolidating {members} similar properties starting with '{prefix}'")
    }));

    suggestions.extend(duplicate_groups(&names).into_iter().map(|group| {
        let mut quoted: Vec<String> = group.iter().map(|name| format!("'{name}'")).collect();
        let last = quoted.pop().unwrap_or_default();
        format!(
            "Properties {} and {last} look like duplicates - consider merging them",
            quoted.join(", ")
        )
    }));

    let assessment = names
        .iter()
        .filter(|name| name.starts_with(ASSESSMENT_PREFIX))
        .count();
    if assessment > ASSESSMENT_THRESHOLD {
        suggestions.push(format!(
            "{assessment} assessment properties (prefixed '{ASSESSMENT_PREFIX}') could be consolidated into fewer multi-select fields"
        ));
    }

    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

fn prefix_families(names: &BTreeSet<&str>) -> BTreeMap<String, usize> {
    let mut families = BTreeMap::new();
    for name in names {
        let prefix = name
            .split('_')
            .take(PREFIX_TOKENS)
            .collect::<Vec<_>>()
            .join("_");
        *families.entry(prefix).or_insert(0) += 1;
    }
    families
}

/// Names that collapse to the same string once underscores are removed,
/// e.g. `lead_source` and `leadsource`. Groups are sorted by name.
fn duplicate_groups<'a>(names: &BTreeSet<&'a str>) -> Vec<Vec<&'a str>> {
    let mut by_squashed: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for name in names {
        by_squashed
            .entry(name.replace('_', "").to_lowercase())
            .or_default()
            .push(name);
    }
    by_squashed
        .into_values()
        .filter(|group| group.len() > 1)
        .collect()
}

/// A form field identity across forms.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FieldKey {
    pub name: String,
    pub field_type: String,
}

/// Named fields of every field group of a form.
fn fields(form: &RawRecord) -> impl Iterator<Item = &RawRecord> + '_ {
    record::list(form, "formFieldGroups")
        .iter()
        .filter_map(Value::as_object)
        .flat_map(|group| record::list(group, "fields").iter().filter_map(Value::as_object))
        .filter(|field| !record::text(field, "name").is_empty())
}

/// How many forms use each (name, type) field. A form counts once per field.
pub fn field_usage(forms: &[RawRecord]) -> BTreeMap<FieldKey, usize> {
    let mut usage = BTreeMap::new();
    for form in forms {
        let seen: BTreeSet<FieldKey> = fields(form)
            .map(|field| FieldKey {
                name: record::text(field, "name").to_string(),
                field_type: record::text_or(field, &["fieldType", "type"], "unknown"),
            })
            .collect();
        for key in seen {
            *usage.entry(key).or_insert(0) += 1;
        }
    }
    usage
}

/// Property name to the names of the forms collecting it, in form order.
pub fn property_form_usage(forms: &[RawRecord]) -> BTreeMap<String, Vec<String>> {
    let mut usage: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for form in forms {
        let form_name = record::text_or(form, &["name"], "Unknown Form");
        let names: BTreeSet<&str> = fields(form).map(|field| record::text(field, "name")).collect();
        for name in names {
            usage
                .entry(name.to_string())
                .or_default()
                .push(form_name.clone());
        }
    }
    usage
}

/// Properties on at least [`HIGH_VALUE_MIN_FORMS`] forms, most widely used first.
pub fn high_value_properties(usage: &BTreeMap<String, Vec<String>>) -> Vec<(&str, &[String])> {
    let mut ranked: Vec<(&str, &[String])> = usage
        .iter()
        .filter(|(_, forms)| forms.len() >= HIGH_VALUE_MIN_FORMS)
        .map(|(name, forms)| (name.as_str(), forms.as_slice()))
        .collect();
    ranked.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(b.0)));
    ranked
}

/// Fields shared by at least half of all forms and by more than one form,
/// most widely used first.
pub fn common_fields(
    usage: &BTreeMap<FieldKey, usize>,
    total_forms: usize,
) -> Vec<(FieldKey, usize)> {
    let mut common: Vec<(FieldKey, usize)> = usage
        .iter()
        .filter(|(_, forms)| **forms > 1 && (**forms as f64) >= total_forms as f64 * 0.5)
        .map(|(key, forms)| (key.clone(), *forms))
        .collect();
    common.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    common
}
