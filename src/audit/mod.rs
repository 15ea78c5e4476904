//! The audit scoring engine.
//!
//! Raw gateway records flow through per-category metric extraction, tiered
//! scoring and rule-based findings, then get aggregated into one result.

pub mod aggregate;
pub mod categories;
pub mod consolidation;
pub mod engine;
pub mod enrichment;
pub mod findings;
pub mod metrics;
pub mod record;
pub mod scoring;
pub mod thresholds;
pub mod types;

pub use aggregate::{aggregate, AuditError, Overall};
pub use engine::AuditEngine;
pub use enrichment::{enrich_results, NarrativeEnricher, OfflineNarrative};
pub use metrics::{CategoryMetrics, MetricValue};
pub use scoring::{score_to_grade, Scorer};
pub use thresholds::{ScoringThresholds, ThresholdError};
pub use types::{
    ActionItem, AiEnrichment, AuditResults, Category, CategoryResult, CategoryStatus, Grade, Level,
    Timeline,
};
