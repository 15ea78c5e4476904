use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sampled summary of one entity, kept for display only.
pub type SampleRecord = BTreeMap<String, serde_json::Value>;

/// A single named metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(u64),
    /// Rounded to one decimal place at construction.
    Percentage(f64),
    Labels(Vec<String>),
    Samples(Vec<SampleRecord>),
}

impl MetricValue {
    /// Numeric view used by threshold checks and rule predicates.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetricValue::Count(n) => Some(*n as f64),
            MetricValue::Percentage(p) => Some(*p),
            MetricValue::Labels(_) | MetricValue::Samples(_) => None,
        }
    }
}

/// Normalised metrics for one category.
///
/// Built once through [`MetricsBuilder`]; there are no mutators afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryMetrics(BTreeMap<String, MetricValue>);

impl CategoryMetrics {
    pub fn builder() -> MetricsBuilder {
        MetricsBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&MetricValue> {
        self.0.get(name)
    }

    /// Numeric value of `name`, 0 when absent or non-numeric.
    pub fn number(&self, name: &str) -> f64 {
        self.get(name).and_then(MetricValue::as_number).unwrap_or(0.0)
    }

    /// Count value of `name`, 0 when absent.
    pub fn count(&self, name: &str) -> u64 {
        match self.get(name) {
            Some(MetricValue::Count(n)) => *n,
            Some(MetricValue::Percentage(p)) if *p >= 0.0 => p.round() as u64,
            _ => 0,
        }
    }

    pub fn labels(&self, name: &str) -> &[String] {
        match self.get(name) {
            Some(MetricValue::Labels(labels)) => labels,
            _ => &[],
        }
    }

    pub fn samples(&self, name: &str) -> &[SampleRecord] {
        match self.get(name) {
            Some(MetricValue::Samples(samples)) => samples,
            _ => &[],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetricValue)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Default)]
pub struct MetricsBuilder {
    values: BTreeMap<String, MetricValue>,
}

impl MetricsBuilder {
    pub fn count(mut self, name: &str, value: usize) -> Self {
        self.values
            .insert(name.to_string(), MetricValue::Count(value as u64));
        self
    }

    pub fn percentage(mut self, name: &str, value: f64) -> Self {
        self.values
            .insert(name.to_string(), MetricValue::Percentage(round1(value)));
        self
    }

    pub fn labels(mut self, name: &str, labels: Vec<String>) -> Self {
        self.values
            .insert(name.to_string(), MetricValue::Labels(labels));
        self
    }

    pub fn samples(mut self, name: &str, samples: Vec<SampleRecord>) -> Self {
        self.values
            .insert(name.to_string(), MetricValue::Samples(samples));
        self
    }

    pub fn build(self) -> CategoryMetrics {
        CategoryMetrics(self.values)
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `part / whole * 100`, or 0 when `whole` is 0.
pub fn percentage_of(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_are_rounded_on_insert() {
        let metrics = CategoryMetrics::builder()
            .percentage("unused_percentage", percentage_of(1, 3))
            .build();
        assert_eq!(metrics.number("unused_percentage"), 33.3);
    }

    #[test]
    fn missing_metrics_read_as_zero() {
        let metrics = CategoryMetrics::default();
        assert_eq!(metrics.number("total_users"), 0.0);
        assert_eq!(metrics.count("total_users"), 0);
        assert!(metrics.labels("super_admin_names").is_empty());
    }

    #[test]
    fn zero_denominator_is_zero_percent() {
        assert_eq!(percentage_of(0, 0), 0.0);
        assert_eq!(percentage_of(3, 0), 0.0);
    }

    #[test]
    fn serialises_as_flat_mapping() {
        let metrics = CategoryMetrics::builder()
            .count("total_users", 8)
            .percentage("unused_percentage", 12.5)
            .labels("super_admin_names", vec!["ops@example.com".to_string()])
            .build();

        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["total_users"], 8);
        assert_eq!(json["unused_percentage"], 12.5);
        assert_eq!(json["super_admin_names"][0], "ops@example.com");

        let back: CategoryMetrics = serde_json::from_value(json).unwrap();
        assert_eq!(back, metrics);
    }
}
