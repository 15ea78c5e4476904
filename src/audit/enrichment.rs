//! Narrative enrichment of finished audit results.
//!
//! The engine does not talk to any language model. A consumer that does
//! implements [`NarrativeEnricher`]. When it fails, results still go out with
//! the rule-based parts of the narrative: an executive summary banded by
//! overall score, a risk level from the number of critical issues and an
//! action plan built from the findings.

use async_trait::async_trait;
use tracing::warn;

use super::types::{ActionItem, AiEnrichment, AuditResults, Level, Timeline};

/// Upper bound on generated action plan items
pub const MAX_ACTION_ITEMS: usize = 10;

#[async_trait]
pub trait NarrativeEnricher: Send + Sync {
    async fn enrich(&self, results: &AuditResults) -> anyhow::Result<AiEnrichment>;
}

/// Enricher for runs without a language model: only the rule-based narrative.
pub struct OfflineNarrative;

#[async_trait]
impl NarrativeEnricher for OfflineNarrative {
    async fn enrich(&self, results: &AuditResults) -> anyhow::Result<AiEnrichment> {
        Ok(AiEnrichment::fallback(results))
    }
}

impl AiEnrichment {
    /// Narrative used when model enrichment is unavailable
    pub fn fallback(results: &AuditResults) -> Self {
        Self {
            ai_summary: "AI analysis temporarily unavailable".to_string(),
            ai_recommendations: vec![
                "Review audit results manually for immediate insights".to_string(),
            ],
            action_plan: action_plan(results),
            executive_summary: executive_summary(results),
            risk_assessment: risk_assessment(results),
        }
    }
}

/// One sentence banded by overall score: 4.0 / 3.0 / 2.0.
pub fn executive_summary(results: &AuditResults) -> String {
    let score = results.overall_score;
    let grade = results.overall_grade;
    if score >= 4.0 {
        format!(
            "Excellent HubSpot setup (Grade {grade}). Your marketing operations are well-optimized with minimal areas for improvement."
        )
    } else if score >= 3.0 {
        format!(
            "Good HubSpot foundation (Grade {grade}) with several optimization opportunities to maximize your marketing effectiveness."
        )
    } else if score >= 2.0 {
        format!(
            "Developing HubSpot setup (Grade {grade}) with significant opportunities to improve lead generation and automation efficiency."
        )
    } else {
        format!(
            "HubSpot setup needs attention (Grade {grade}). Critical gaps in your marketing operations require immediate focus."
        )
    }
}

pub fn critical_issue_count(results: &AuditResults) -> usize {
    results
        .categories()
        .map(|(_, result)| result.critical_issues.len())
        .sum()
}

/// Low with no critical issues, Medium up to three, High beyond.
pub fn risk_assessment(results: &AuditResults) -> String {
    match critical_issue_count(results) {
        0 => "Low Risk: No critical issues identified in your HubSpot setup.".to_string(),
        count @ 1..=3 => format!(
            "Medium Risk: {count} critical issues require attention to prevent lead generation gaps."
        ),
        count => format!(
            "High Risk: {count} critical issues could significantly impact your marketing performance."
        ),
    }
}

/// Critical issues first, then recommendations of scored categories, in category order.
pub fn action_plan(results: &AuditResults) -> Vec<ActionItem> {
    let issues = results.categories().flat_map(|(category, result)| {
        result.critical_issues.iter().map(move |issue| ActionItem {
            action: issue.clone(),
            priority: Level::High,
            timeline: Timeline::Immediate,
            effort: Level::Medium,
            impact: Level::High,
            category,
        })
    });

    let recommendations = results
        .categories()
        .filter(|(_, result)| result.is_scored())
        .flat_map(|(category, result)| {
            result.recommendations.iter().map(move |recommendation| ActionItem {
                action: recommendation.clone(),
                priority: Level::Medium,
                timeline: Timeline::ShortTerm,
                effort: Level::Low,
                impact: Level::Medium,
                category,
            })
        });

    issues.chain(recommendations).take(MAX_ACTION_ITEMS).collect()
}

/// Attach a narrative to `results`. Never fails.
pub async fn enrich_results(
    mut results: AuditResults,
    enricher: &dyn NarrativeEnricher,
) -> AuditResults {
    let enrichment = match enricher.enrich(&results).await {
        Ok(enrichment) => enrichment,
        Err(e) => {
            warn!(error = %e, "Narrative enrichment failed, using fallback");
            AiEnrichment::fallback(&results)
        }
    };
    results.enrichment = Some(enrichment);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::metrics::CategoryMetrics;
    use crate::audit::scoring::score_to_grade;
    use crate::audit::types::{Category, CategoryResult, CategoryStatus};

    struct Unreachable;

    #[async_trait]
    impl NarrativeEnricher for Unreachable {
        async fn enrich(&self, _results: &AuditResults) -> anyhow::Result<AiEnrichment> {
            anyhow::bail!("model endpoint timed out")
        }
    }

    struct Canned;

    #[async_trait]
    impl NarrativeEnricher for Canned {
        async fn enrich(&self, results: &AuditResults) -> anyhow::Result<AiEnrichment> {
            Ok(AiEnrichment {
                ai_summary: format!("Overall grade {}", results.overall_grade),
                ..AiEnrichment::default()
            })
        }
    }

    fn scored(score: f64, critical: &[&str], recommendations: &[&str]) -> CategoryResult {
        CategoryResult {
            score: Some(score),
            grade: score_to_grade(score),
            metrics: CategoryMetrics::default(),
            recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
            critical_issues: critical.iter().map(|c| c.to_string()).collect(),
            status: CategoryStatus::Ok,
        }
    }

    fn results_with(overall: f64, critical_per_category: usize) -> AuditResults {
        let issues: Vec<String> = (0..critical_per_category)
            .map(|i| format!("issue {i}"))
            .collect();
        let issues: Vec<&str> = issues.iter().map(String::as_str).collect();
        let mut results = AuditResults::empty();
        results.admin = scored(overall, &issues, &[]);
        results.properties = scored(overall, &issues, &[]);
        results.overall_score = overall;
        results.overall_grade = score_to_grade(overall);
        results
    }

    #[tokio::test]
    async fn failure_falls_back_to_rule_based_narrative() {
        let results = enrich_results(results_with(4.2, 0), &Unreachable).await;
        let enrichment = results.enrichment.clone().unwrap();
        assert_eq!(enrichment.ai_summary, "AI analysis temporarily unavailable");
        assert!(enrichment.executive_summary.starts_with("Excellent HubSpot setup (Grade B)"));
        assert!(enrichment.risk_assessment.starts_with("Low Risk"));
    }

    #[tokio::test]
    async fn enrichment_is_flattened_into_serialized_results() {
        let results = enrich_results(AuditResults::empty(), &Canned).await;
        let value = serde_json::to_value(&results).unwrap();
        assert_eq!(value["ai_summary"], "Overall grade F");
        assert_eq!(value["overall_grade"], "F");

        let plain = serde_json::to_value(AuditResults::empty()).unwrap();
        assert!(plain.get("ai_summary").is_none());
    }

    #[test]
    fn executive_summary_bands() {
        let band = |score: f64| executive_summary(&results_with(score, 0));
        assert!(band(4.0).starts_with("Excellent HubSpot setup (Grade B)"));
        assert!(band(5.0).starts_with("Excellent HubSpot setup (Grade A)"));
        assert!(band(3.9).starts_with("Good HubSpot foundation (Grade B)"));
        assert!(band(3.0).starts_with("Good HubSpot foundation (Grade C)"));
        assert!(band(2.0).starts_with("Developing HubSpot setup (Grade D)"));
        assert!(band(1.9).starts_with("HubSpot setup needs attention (Grade D)"));
        assert!(band(0.0).starts_with("HubSpot setup needs attention (Grade F)"));
    }

    #[test]
    fn risk_levels_follow_critical_issue_count() {
        // two scored categories, so the total is twice the per-category count
        assert!(risk_assessment(&results_with(3.0, 0)).starts_with("Low Risk"));
        assert_eq!(
            risk_assessment(&results_with(3.0, 1)),
            "Medium Risk: 2 critical issues require attention to prevent lead generation gaps."
        );
        assert!(risk_assessment(&results_with(3.0, 2)).starts_with("High Risk: 4 critical issues"));
    }

    #[test]
    fn action_plan_puts_critical_issues_first() {
        let mut results = AuditResults::empty();
        results.admin = scored(3.5, &[], &["Reduce super admins"]);
        results.workflows = scored(2.0, &["No workflows found"], &["Build a nurture flow"]);

        let plan = action_plan(&results);
        assert_eq!(plan.len(), 3);
        assert_eq!(plan[0].action, "No workflows found");
        assert_eq!(plan[0].priority, Level::High);
        assert_eq!(plan[0].timeline, Timeline::Immediate);
        assert_eq!(plan[0].category, Category::Workflows);
        assert_eq!(plan[1].action, "Reduce super admins");
        assert_eq!(plan[1].timeline, Timeline::ShortTerm);

        let value = serde_json::to_value(&plan[1]).unwrap();
        assert_eq!(value["timeline"], "Short-term");
        assert_eq!(value["priority"], "Medium");
        assert_eq!(value["category"], "admin");
    }

    #[test]
    fn action_plan_skips_guidance_of_unscored_categories_and_is_capped() {
        // every category of an empty result only carries status guidance
        assert!(action_plan(&AuditResults::empty()).is_empty());

        let many: Vec<String> = (0..8).map(|i| format!("issue {i}")).collect();
        let many: Vec<&str> = many.iter().map(String::as_str).collect();
        let mut results = AuditResults::empty();
        results.admin = scored(2.0, &many, &[]);
        results.sales = scored(2.0, &many, &[]);
        assert_eq!(action_plan(&results).len(), MAX_ACTION_ITEMS);
    }
}
