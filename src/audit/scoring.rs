use std::sync::Arc;

use super::metrics::{round1, CategoryMetrics};
use super::thresholds::{ScoringThresholds, Tier};
use super::types::{Category, Grade};

pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 5.0;

/// Common (name, type) fields across forms beyond which consolidation is penalised
const COMMON_FIELDS_PENALTY_AFTER: u64 = 3;
const COMMON_FIELDS_PENALTY: f64 = 0.3;

/// Shared breakpoints: 4.5 / 3.5 / 2.5 / 1.5.
pub fn score_to_grade(score: f64) -> Grade {
    if score >= 4.5 {
        Grade::A
    } else if score >= 3.5 {
        Grade::B
    } else if score >= 2.5 {
        Grade::C
    } else if score >= 1.5 {
        Grade::D
    } else {
        Grade::F
    }
}

/// Maps category metrics to a score using an injected threshold table.
#[derive(Debug, Clone)]
pub struct Scorer {
    thresholds: Arc<ScoringThresholds>,
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(Arc::new(ScoringThresholds::default()))
    }
}

impl Scorer {
    pub fn new(thresholds: Arc<ScoringThresholds>) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ScoringThresholds {
        &self.thresholds
    }

    pub fn tier(&self, category: Category, metrics: &CategoryMetrics) -> Tier {
        self.thresholds.for_category(category).tier_for(metrics)
    }

    pub fn score(&self, category: Category, metrics: &CategoryMetrics) -> f64 {
        match category {
            Category::Forms => self.forms_score(metrics),
            _ => self.tier(category, metrics).score(),
        }
    }

    /// Base tier score plus usage adjustments, clamped to [1.0, 5.0].
    pub fn forms_score(&self, metrics: &CategoryMetrics) -> f64 {
        let base = self.tier(Category::Forms, metrics).score();
        forms_adjusted_score(
            base,
            metrics.count("sampled_forms"),
            metrics.number("unused_forms_percentage"),
            metrics.count("common_fields_count"),
        )
    }
}

/// Usage adjustment for forms. Nothing sampled means no usage signal.
pub fn forms_adjusted_score(
    base: f64,
    sampled_forms: u64,
    unused_forms_percentage: f64,
    common_fields: u64,
) -> f64 {
    let mut adjustment = 0.0;

    if sampled_forms > 0 {
        adjustment += if unused_forms_percentage <= 20.0 {
            0.5
        } else if unused_forms_percentage <= 50.0 {
            0.0
        } else {
            -1.0
        };
    }

    if common_fields > COMMON_FIELDS_PENALTY_AFTER {
        adjustment -= COMMON_FIELDS_PENALTY;
    }

    round1((base + adjustment).clamp(MIN_SCORE, MAX_SCORE))
}
