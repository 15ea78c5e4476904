use serde::{Deserialize, Serialize};
use std::fmt;

use super::metrics::CategoryMetrics;

/// Audited functional area of a portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Admin,
    Properties,
    Workflows,
    Forms,
    Reporting,
    Sales,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Admin,
        Category::Properties,
        Category::Workflows,
        Category::Forms,
        Category::Reporting,
        Category::Sales,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Category::Admin => "admin",
            Category::Properties => "properties",
            Category::Workflows => "workflows",
            Category::Forms => "forms",
            Category::Reporting => "reporting",
            Category::Sales => "sales",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Category::Admin => "Admin & Setup",
            Category::Properties => "Custom Properties",
            Category::Workflows => "Workflows",
            Category::Forms => "Forms",
            Category::Reporting => "Reporting",
            Category::Sales => "Sales Pipelines",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Outcome of one category audit. Only `Ok` participates in aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryStatus {
    Ok,
    InsufficientPermissions,
    ApiError,
    DataUnavailable,
}

impl CategoryStatus {
    /// User-facing next step for a category that could not be scored
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            CategoryStatus::Ok => None,
            CategoryStatus::InsufficientPermissions => {
                Some("Insufficient permissions — re-authenticate with broader scopes")
            }
            CategoryStatus::ApiError => Some("Unable to retrieve data — try again"),
            CategoryStatus::DataUnavailable => Some("No data found"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
            Grade::NotApplicable => "N/A",
        }
    }

    /// Short health label used by the report renderers
    pub fn describe(&self) -> &'static str {
        match self {
            Grade::A => "Excellent",
            Grade::B => "Good",
            Grade::C => "Fair",
            Grade::D => "Poor",
            Grade::F => "Critical",
            Grade::NotApplicable => "Not assessed",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of auditing one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    /// `None` exactly when `status` is not `Ok`
    pub score: Option<f64>,
    pub grade: Grade,
    pub metrics: CategoryMetrics,
    pub recommendations: Vec<String>,
    pub critical_issues: Vec<String>,
    pub status: CategoryStatus,
}

impl CategoryResult {
    /// A category that could not be scored; carries the status guidance as its only recommendation.
    pub fn unavailable(status: CategoryStatus) -> Self {
        Self {
            score: None,
            grade: Grade::NotApplicable,
            metrics: CategoryMetrics::default(),
            recommendations: status.guidance().map(str::to_string).into_iter().collect(),
            critical_issues: Vec::new(),
            status,
        }
    }

    pub fn is_scored(&self) -> bool {
        self.status == CategoryStatus::Ok && self.score.is_some()
    }
}

/// Low / Medium / High, as used for action priority, effort and impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    Low,
    Medium,
    High,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Level::Low => "Low",
            Level::Medium => "Medium",
            Level::High => "High",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeline {
    Immediate,
    #[serde(rename = "Short-term")]
    ShortTerm,
    #[serde(rename = "Long-term")]
    LongTerm,
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Timeline::Immediate => "Immediate",
            Timeline::ShortTerm => "Short-term",
            Timeline::LongTerm => "Long-term",
        };
        f.write_str(label)
    }
}

/// One prioritised step of an action plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    #[serde(default)]
    pub action: String,
    pub priority: Level,
    pub timeline: Timeline,
    pub effort: Level,
    pub impact: Level,
    /// Audit area the action addresses
    pub category: Category,
}

/// Narrative fields attached by an external enrichment step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiEnrichment {
    pub ai_summary: String,
    pub ai_recommendations: Vec<String>,
    pub action_plan: Vec<ActionItem>,
    pub executive_summary: String,
    pub risk_assessment: String,
}

/// Complete output of one audit run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResults {
    pub admin: CategoryResult,
    pub properties: CategoryResult,
    pub workflows: CategoryResult,
    pub forms: CategoryResult,
    pub reporting: CategoryResult,
    pub sales: CategoryResult,
    pub overall_score: f64,
    pub overall_grade: Grade,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<AiEnrichment>,
}

impl AuditResults {
    /// Result returned when the run itself could not be assembled
    pub fn empty() -> Self {
        let failed = CategoryResult::unavailable(CategoryStatus::ApiError);
        Self {
            admin: failed.clone(),
            properties: failed.clone(),
            workflows: failed.clone(),
            forms: failed.clone(),
            reporting: failed.clone(),
            sales: failed,
            overall_score: 0.0,
            overall_grade: Grade::F,
            enrichment: None,
        }
    }

    pub fn category(&self, category: Category) -> &CategoryResult {
        match category {
            Category::Admin => &self.admin,
            Category::Properties => &self.properties,
            Category::Workflows => &self.workflows,
            Category::Forms => &self.forms,
            Category::Reporting => &self.reporting,
            Category::Sales => &self.sales,
        }
    }

    pub fn categories(&self) -> impl Iterator<Item = (Category, &CategoryResult)> {
        Category::ALL
            .into_iter()
            .map(move |category| (category, self.category(category)))
    }

    /// True when no category produced a score
    pub fn is_empty(&self) -> bool {
        self.categories().all(|(_, result)| !result.is_scored())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_results_carry_guidance_and_no_score() {
        let result = CategoryResult::unavailable(CategoryStatus::InsufficientPermissions);
        assert_eq!(result.score, None);
        assert_eq!(result.grade, Grade::NotApplicable);
        assert_eq!(
            result.recommendations,
            vec!["Insufficient permissions — re-authenticate with broader scopes".to_string()]
        );
        assert!(!result.is_scored());
    }

    #[test]
    fn wire_names_match_report_consumers() {
        let json =
            serde_json::to_value(CategoryResult::unavailable(CategoryStatus::DataUnavailable))
                .unwrap();
        assert_eq!(json["status"], "data_unavailable");
        assert_eq!(json["grade"], "N/A");
        assert!(json["score"].is_null());
    }

    #[test]
    fn enrichment_fields_flatten_into_results() {
        let mut results = AuditResults::empty();
        assert!(results.is_empty());
        let json = serde_json::to_value(&results).unwrap();
        assert!(json.get("ai_summary").is_none());

        results.enrichment = Some(AiEnrichment {
            ai_summary: "Summary".to_string(),
            ..AiEnrichment::default()
        });
        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(json["ai_summary"], "Summary");
        assert_eq!(json["overall_grade"], "F");
    }
}
