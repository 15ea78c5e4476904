//! Per-category scoring thresholds.
//!
//! The table is plain data: built once (defaults or a TOML override), shared
//! read-only behind an `Arc`, and handed to the scorer explicitly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use super::metrics::CategoryMetrics;
use super::types::Category;

#[derive(Debug, Error)]
pub enum ThresholdError {
    #[error("failed to read thresholds file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse thresholds file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid thresholds for {category} ({tier}): {reason}")]
    Invalid {
        category: Category,
        tier: &'static str,
        reason: String,
    },
}

/// Inclusive numeric range; `max = None` means no upper limit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRange {
    pub min: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl ThresholdRange {
    pub const fn between(min: f64, max: f64) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    pub const fn at_least(min: f64) -> Self {
        Self { min, max: None }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && self.max.map_or(true, |max| value <= max)
    }
}

/// Metric name → required range. Every listed metric must be in range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierRule(BTreeMap<String, ThresholdRange>);

impl TierRule {
    fn of(entries: &[(&str, ThresholdRange)]) -> Self {
        Self(
            entries
                .iter()
                .map(|(name, range)| (name.to_string(), *range))
                .collect(),
        )
    }

    pub fn matches(&self, metrics: &CategoryMetrics) -> bool {
        !self.0.is_empty()
            && self
                .0
                .iter()
                .all(|(name, range)| range.contains(metrics.number(name)))
    }

    pub fn ranges(&self) -> impl Iterator<Item = (&String, &ThresholdRange)> {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Excellent,
    Good,
    Poor,
}

impl Tier {
    pub fn score(&self) -> f64 {
        match self {
            Tier::Excellent => 5.0,
            Tier::Good => 3.5,
            Tier::Poor => 2.0,
        }
    }
}

/// Three tiers for one category. `poor` is descriptive: anything that is
/// neither excellent nor good scores as poor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryThresholds {
    pub excellent: TierRule,
    pub good: TierRule,
    #[serde(default)]
    pub poor: TierRule,
}

impl CategoryThresholds {
    /// First matching tier in order excellent → good, else poor.
    pub fn tier_for(&self, metrics: &CategoryMetrics) -> Tier {
        if self.excellent.matches(metrics) {
            Tier::Excellent
        } else if self.good.matches(metrics) {
            Tier::Good
        } else {
            Tier::Poor
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringThresholds {
    pub admin: CategoryThresholds,
    pub properties: CategoryThresholds,
    pub workflows: CategoryThresholds,
    /// Base tiers only; usage adjustments are applied by the scorer
    pub forms: CategoryThresholds,
    pub reporting: CategoryThresholds,
    pub sales: CategoryThresholds,
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        use ThresholdRange as R;

        Self {
            admin: CategoryThresholds {
                excellent: TierRule::of(&[
                    ("total_users", R::between(1.0, 10.0)),
                    ("super_admins_count", R::between(1.0, 3.0)),
                    ("active_integrations_count", R::at_least(3.0)),
                ]),
                good: TierRule::of(&[
                    ("total_users", R::between(11.0, 25.0)),
                    ("super_admins_count", R::between(4.0, 5.0)),
                    ("active_integrations_count", R::between(1.0, 2.0)),
                ]),
                poor: TierRule::of(&[
                    ("total_users", R::at_least(26.0)),
                    ("super_admins_count", R::at_least(6.0)),
                    ("active_integrations_count", R::between(0.0, 0.0)),
                ]),
            },
            properties: CategoryThresholds {
                excellent: TierRule::of(&[("unused_percentage", R::between(0.0, 10.0))]),
                good: TierRule::of(&[("unused_percentage", R::between(0.0, 25.0))]),
                poor: TierRule::of(&[("unused_percentage", R::at_least(26.0))]),
            },
            workflows: CategoryThresholds {
                excellent: TierRule::of(&[
                    ("total_workflows", R::at_least(5.0)),
                    ("inactive_percentage", R::between(0.0, 10.0)),
                ]),
                good: TierRule::of(&[
                    ("total_workflows", R::between(2.0, 4.0)),
                    ("inactive_percentage", R::between(0.0, 25.0)),
                ]),
                poor: TierRule::of(&[
                    ("total_workflows", R::between(0.0, 1.0)),
                    ("inactive_percentage", R::at_least(26.0)),
                ]),
            },
            forms: CategoryThresholds {
                excellent: TierRule::of(&[
                    ("total_forms", R::at_least(3.0)),
                    ("unembedded_percentage", R::between(0.0, 20.0)),
                ]),
                good: TierRule::of(&[
                    ("total_forms", R::between(1.0, 2.0)),
                    ("unembedded_percentage", R::between(0.0, 40.0)),
                ]),
                poor: TierRule::of(&[
                    ("total_forms", R::between(0.0, 0.0)),
                    ("unembedded_percentage", R::at_least(41.0)),
                ]),
            },
            reporting: CategoryThresholds {
                excellent: TierRule::of(&[
                    ("total_dashboards", R::at_least(2.0)),
                    ("custom_reports", R::at_least(1.0)),
                ]),
                good: TierRule::of(&[
                    ("total_dashboards", R::at_least(1.0)),
                    ("custom_reports", R::at_least(0.0)),
                ]),
                poor: TierRule::of(&[
                    ("total_dashboards", R::between(0.0, 0.0)),
                    ("custom_reports", R::between(0.0, 0.0)),
                ]),
            },
            sales: CategoryThresholds {
                excellent: TierRule::of(&[
                    ("total_pipelines", R::at_least(2.0)),
                    ("unassigned_deals_percentage", R::between(0.0, 5.0)),
                ]),
                good: TierRule::of(&[
                    ("total_pipelines", R::at_least(1.0)),
                    ("unassigned_deals_percentage", R::between(0.0, 15.0)),
                ]),
                poor: TierRule::of(&[
                    ("total_pipelines", R::between(0.0, 0.0)),
                    ("unassigned_deals_percentage", R::at_least(16.0)),
                ]),
            },
        }
    }
}

impl ScoringThresholds {
    pub fn for_category(&self, category: Category) -> &CategoryThresholds {
        match category {
            Category::Admin => &self.admin,
            Category::Properties => &self.properties,
            Category::Workflows => &self.workflows,
            Category::Forms => &self.forms,
            Category::Reporting => &self.reporting,
            Category::Sales => &self.sales,
        }
    }

    /// Load a replacement table from TOML and validate it.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ThresholdError> {
        let path_str = path.as_ref().display().to_string();
        let text = std::fs::read_to_string(path.as_ref()).map_err(|source| ThresholdError::Io {
            path: path_str.clone(),
            source,
        })?;
        let table: ScoringThresholds =
            toml::from_str(&text).map_err(|source| ThresholdError::Parse {
                path: path_str,
                source,
            })?;
        table.validate()?;
        Ok(table)
    }

    /// The configured override when `thresholds_path` is set, otherwise the built-in table.
    pub fn from_settings(settings: &crate::config::AuditSettings) -> Result<Self, ThresholdError> {
        match settings.thresholds_path.as_deref() {
            Some(path) => Self::from_toml_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ThresholdError> {
        for category in Category::ALL {
            let thresholds = self.for_category(category);
            for (tier, rule) in [("excellent", &thresholds.excellent), ("good", &thresholds.good)] {
                if rule.0.is_empty() {
                    return Err(ThresholdError::Invalid {
                        category,
                        tier,
                        reason: "tier lists no metrics".to_string(),
                    });
                }
            }
            for (tier, rule) in [
                ("excellent", &thresholds.excellent),
                ("good", &thresholds.good),
                ("poor", &thresholds.poor),
            ] {
                for (metric, range) in rule.ranges() {
                    if range.max.is_some_and(|max| max < range.min) || !range.min.is_finite() {
                        return Err(ThresholdError::Invalid {
                            category,
                            tier,
                            reason: format!("range for {metric} is empty or not finite"),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
