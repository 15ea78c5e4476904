use serde_json::json;

use crate::audit::consolidation;
use crate::audit::metrics::{percentage_of, CategoryMetrics, MetricsBuilder, SampleRecord};
use crate::audit::record;
use crate::gateway::RawRecord;

/// Names the platform itself creates, even when not flagged as platform-defined
pub const SYSTEM_PREFIXES: &[&str] = &[
    "hs_",
    "hubspot_",
    "createdate",
    "lastmodifieddate",
    "website",
    "domain",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Contact,
    Company,
    Deal,
}

impl ObjectType {
    fn label(&self) -> &'static str {
        match self {
            ObjectType::Contact => "contact",
            ObjectType::Company => "company",
            ObjectType::Deal => "deal",
        }
    }

    fn type_id(&self) -> &'static str {
        match self {
            ObjectType::Contact => "0-1",
            ObjectType::Company => "0-2",
            ObjectType::Deal => "0-3",
        }
    }

    const ALL: [ObjectType; 3] = [ObjectType::Contact, ObjectType::Company, ObjectType::Deal];
}

/// Property definitions grouped by the collection they were fetched from
pub struct PropertySets<'a> {
    pub contact: &'a [RawRecord],
    pub company: &'a [RawRecord],
    pub deal: &'a [RawRecord],
    /// Forms to cross-reference; `None` when they could not be fetched
    pub forms: Option<&'a [RawRecord]>,
}

impl<'a> PropertySets<'a> {
    fn iter(&self) -> impl Iterator<Item = (ObjectType, &'a RawRecord)> {
        let contact = self.contact.iter().map(|p| (ObjectType::Contact, p));
        let company = self.company.iter().map(|p| (ObjectType::Company, p));
        let deal = self.deal.iter().map(|p| (ObjectType::Deal, p));
        contact.chain(company).chain(deal)
    }

    fn len(&self) -> usize {
        self.contact.len() + self.company.len() + self.deal.len()
    }
}

pub fn is_custom(property: &RawRecord) -> bool {
    let name = record::text(property, "name");
    !record::flag(property, "hubspotDefined", true)
        && !record::flag(property, "calculated", false)
        && !SYSTEM_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

/// Conservative guess: a free-text field nobody is forced to fill and nothing references.
///
/// Real usage would need per-record population counts, which the property
/// schema does not carry.
pub fn is_likely_unused(property: &RawRecord) -> bool {
    record::text(property, "type") == "string"
        && !record::flag(property, "required", false)
        && record::list(property, "options").is_empty()
        && record::text(property, "referencedObjectType").is_empty()
}

/// Explicit `objectType` first, then an `objectTypeId` substring, then the source collection.
pub fn object_type_of(property: &RawRecord, source: ObjectType) -> ObjectType {
    let explicit = record::text(property, "objectType").to_lowercase();
    if !explicit.is_empty() {
        if let Some(found) = ObjectType::ALL
            .into_iter()
            .find(|kind| explicit.contains(kind.label()))
        {
            return found;
        }
    }

    let type_id = record::text(property, "objectTypeId");
    if !type_id.is_empty() {
        if let Some(found) = ObjectType::ALL
            .into_iter()
            .find(|kind| type_id.contains(kind.type_id()))
        {
            return found;
        }
    }

    source
}

pub fn extract_metrics(sets: &PropertySets<'_>, sample_limit: usize) -> CategoryMetrics {
    let custom: Vec<(ObjectType, &RawRecord)> = sets
        .iter()
        .filter(|(_, property)| is_custom(property))
        .map(|(source, property)| (object_type_of(property, source), property))
        .collect();

    let unused: Vec<&(ObjectType, &RawRecord)> = custom
        .iter()
        .filter(|(_, property)| is_likely_unused(property))
        .collect();

    let per_type = |kind: ObjectType| custom.iter().filter(|(t, _)| *t == kind).count();

    let unused_sample: Vec<SampleRecord> = unused
        .iter()
        .take(sample_limit)
        .map(|(kind, property)| {
            SampleRecord::from([
                ("name".to_string(), json!(record::text(property, "name"))),
                (
                    "label".to_string(),
                    json!(record::text_or(property, &["label", "name"], "")),
                ),
                ("object_type".to_string(), json!(kind.label())),
            ])
        })
        .collect();

    let suggestions =
        consolidation::property_suggestions(custom.iter().map(|(_, p)| record::text(p, "name")));

    let metrics = CategoryMetrics::builder()
        .count("total_properties", sets.len())
        .count("total_custom_properties", custom.len())
        .count("unused_properties_count", unused.len())
        .percentage(
            "unused_percentage",
            percentage_of(unused.len(), custom.len()),
        )
        .count("contact_properties", per_type(ObjectType::Contact))
        .count("company_properties", per_type(ObjectType::Company))
        .count("deal_properties", per_type(ObjectType::Deal))
        .samples("unused_properties_sample", unused_sample)
        .labels("consolidation_suggestions", suggestions);

    match sets.forms {
        Some(forms) => form_usage_metrics(metrics, &custom, forms, sample_limit).build(),
        None => metrics.build(),
    }
}

/// Where custom properties appear on forms, and which properties many forms share.
fn form_usage_metrics(
    metrics: MetricsBuilder,
    custom: &[(ObjectType, &RawRecord)],
    forms: &[RawRecord],
    sample_limit: usize,
) -> MetricsBuilder {
    let usage = consolidation::property_form_usage(forms);
    let on_forms = custom
        .iter()
        .filter(|(_, property)| usage.contains_key(record::text(property, "name")))
        .count();

    let high_value = consolidation::high_value_properties(&usage);
    let high_value_sample: Vec<SampleRecord> = high_value
        .iter()
        .take(sample_limit)
        .map(|(name, forms_using)| {
            SampleRecord::from([
                ("name".to_string(), json!(name)),
                ("form_usage_count".to_string(), json!(forms_using.len())),
                ("forms_using".to_string(), json!(forms_using)),
            ])
        })
        .collect();

    metrics
        .count("custom_properties_on_forms", on_forms)
        .count("custom_properties_not_on_forms", custom.len() - on_forms)
        .count("high_value_properties_count", high_value.len())
        .samples("high_value_properties_sample", high_value_sample)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<RawRecord> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn custom_excludes_platform_calculated_and_system_prefixed() {
        let props = records(json!([
            {"name": "firstname", "hubspotDefined": true, "type": "string"},
            {"name": "score_total", "hubspotDefined": false, "calculated": true, "type": "number"},
            {"name": "hs_custom_thing", "hubspotDefined": false, "type": "string"},
            {"name": "website_visits_q1", "hubspotDefined": false, "type": "number"},
            {"name": "nickname", "type": "string"},
            {"name": "favorite_color", "hubspotDefined": false, "type": "string"}
        ]));
        let custom: Vec<_> = props.iter().filter(|p| is_custom(p)).collect();
        assert_eq!(custom.len(), 1);
        assert_eq!(record::text(custom[0], "name"), "favorite_color");
    }

    #[test]
    fn no_custom_properties_means_zero_unused_percentage() {
        let contact = records(json!([{"name": "email", "hubspotDefined": true}]));
        let sets = PropertySets {
            contact: &contact,
            company: &[],
            deal: &[],
            forms: None,
        };
        let metrics = extract_metrics(&sets, 5);
        assert_eq!(metrics.count("total_custom_properties"), 0);
        assert_eq!(metrics.number("unused_percentage"), 0.0);
    }

    #[test]
    fn unused_heuristic_and_percentage() {
        let contact = records(json!([
            {"name": "notes_free_text", "hubspotDefined": false, "type": "string"},
            {"name": "tier", "hubspotDefined": false, "type": "enumeration", "options": [{"value": "gold"}]},
            {"name": "region", "hubspotDefined": false, "type": "string", "options": [{"value": "emea"}]}
        ]));
        let deal = records(json!([
            {"name": "partner_ref", "hubspotDefined": false, "type": "string", "referencedObjectType": "OWNER"},
            {"name": "must_fill", "hubspotDefined": false, "type": "string", "required": true},
            {"name": "legacy_code", "hubspotDefined": false, "type": "string"}
        ]));
        let sets = PropertySets {
            contact: &contact,
            company: &[],
            deal: &deal,
            forms: None,
        };

        let metrics = extract_metrics(&sets, 1);
        assert_eq!(metrics.count("total_properties"), 6);
        assert_eq!(metrics.count("total_custom_properties"), 6);
        assert_eq!(metrics.count("unused_properties_count"), 2);
        assert_eq!(metrics.number("unused_percentage"), 33.3);
        assert_eq!(metrics.count("contact_properties"), 3);
        assert_eq!(metrics.count("deal_properties"), 3);
        assert_eq!(metrics.samples("unused_properties_sample").len(), 1);
    }

    #[test]
    fn form_usage_is_reported_only_when_forms_were_fetched() {
        let contact = records(json!([
            {"name": "industry_segment", "hubspotDefined": false, "type": "enumeration"},
            {"name": "legacy_code", "hubspotDefined": false, "type": "string"},
            {"name": "email", "hubspotDefined": true, "type": "string"}
        ]));
        let forms = records(json!([
            {"name": "Contact us", "formFieldGroups": [{"fields": [{"name": "email"}, {"name": "industry_segment"}]}]},
            {"name": "Demo", "formFieldGroups": [{"fields": [{"name": "email"}, {"name": "industry_segment"}]}]},
            {"name": "Webinar", "formFieldGroups": [{"fields": [{"name": "email"}]}]}
        ]));

        let without = extract_metrics(
            &PropertySets {
                contact: &contact,
                company: &[],
                deal: &[],
                forms: None,
            },
            5,
        );
        assert!(without.get("high_value_properties_count").is_none());

        let metrics = extract_metrics(
            &PropertySets {
                contact: &contact,
                company: &[],
                deal: &[],
                forms: Some(&forms),
            },
            5,
        );
        assert_eq!(metrics.count("custom_properties_on_forms"), 1);
        assert_eq!(metrics.count("custom_properties_not_on_forms"), 1);
        assert_eq!(metrics.count("high_value_properties_count"), 1);
        let sample = metrics.samples("high_value_properties_sample");
        assert_eq!(sample[0]["name"], "email");
        assert_eq!(sample[0]["form_usage_count"], 3);
        assert_eq!(sample[0]["forms_using"], json!(["Contact us", "Demo", "Webinar"]));
    }

    #[test]
    fn object_type_precedence() {
        let explicit = records(json!([{"objectType": "COMPANY", "objectTypeId": "0-3"}]));
        assert_eq!(object_type_of(&explicit[0], ObjectType::Contact), ObjectType::Company);

        let by_id = records(json!([{"objectTypeId": "0-3"}]));
        assert_eq!(object_type_of(&by_id[0], ObjectType::Contact), ObjectType::Deal);

        let neither = records(json!([{"name": "x"}]));
        assert_eq!(object_type_of(&neither[0], ObjectType::Company), ObjectType::Company);
    }
}
