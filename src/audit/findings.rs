//! Recommendation and critical-issue rules.
//!
//! Each rule is an independent predicate over one category's metrics. Rules
//! never see each other's outcome; the output order follows table order.

use super::metrics::CategoryMetrics;
use super::scoring::score_to_grade;
use super::types::{Category, CategoryResult, CategoryStatus};
use FindingKind::{CriticalIssue, Recommendation};
use Op::{Above, Below, Exactly};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingKind {
    Recommendation,
    CriticalIssue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Above,
    Below,
    Exactly,
}

/// `metric <op> value`, metrics read as numbers with 0 for absent.
#[derive(Debug, Clone, Copy)]
pub struct Condition {
    pub metric: &'static str,
    pub op: Op,
    pub value: f64,
}

impl Condition {
    pub fn holds(&self, metrics: &CategoryMetrics) -> bool {
        let actual = metrics.number(self.metric);
        match self.op {
            Op::Above => actual > self.value,
            Op::Below => actual < self.value,
            Op::Exactly => actual == self.value,
        }
    }
}

const fn when(metric: &'static str, op: Op, value: f64) -> Condition {
    Condition { metric, op, value }
}

#[derive(Debug, Clone, Copy)]
pub struct FindingRule {
    pub kind: FindingKind,
    /// All must hold
    pub conditions: &'static [Condition],
    pub text: &'static str,
}

const ADMIN_RULES: &[FindingRule] = &[
    FindingRule {
        kind: Recommendation,
        conditions: &[when("super_admins_count", Above, 5.0)],
        text: "Consider reducing the number of Super Admins for better security",
    },
    FindingRule {
        kind: Recommendation,
        conditions: &[when("active_integrations_count", Exactly, 0.0)],
        text: "Add integrations to improve data flow and automation",
    },
    FindingRule {
        kind: Recommendation,
        conditions: &[when("total_users", Above, 50.0)],
        text: "Review user permissions and consider role-based access control",
    },
    FindingRule {
        kind: CriticalIssue,
        conditions: &[when("super_admins_count", Exactly, 0.0)],
        text: "No Super Admins found — account access risk",
    },
    FindingRule {
        kind: CriticalIssue,
        conditions: &[when("super_admins_count", Above, 10.0)],
        text: "Too many Super Admins — security risk",
    },
];

const PROPERTIES_RULES: &[FindingRule] = &[
    FindingRule {
        kind: Recommendation,
        conditions: &[when("unused_percentage", Above, 25.0)],
        text: "Clean up unused custom properties to improve data quality",
    },
    FindingRule {
        kind: Recommendation,
        conditions: &[when("total_custom_properties", Above, 100.0)],
        text: "Consider consolidating similar properties",
    },
    FindingRule {
        kind: CriticalIssue,
        conditions: &[when("unused_percentage", Above, 50.0)],
        text: "Over 50% of custom properties are unused — major cleanup needed",
    },
];

const WORKFLOWS_RULES: &[FindingRule] = &[
    FindingRule {
        kind: Recommendation,
        conditions: &[when("total_workflows", Below, 3.0)],
        text: "Consider implementing more automation workflows",
    },
    FindingRule {
        kind: Recommendation,
        conditions: &[when("inactive_percentage", Above, 25.0)],
        text: "Review and activate or delete inactive workflows",
    },
    FindingRule {
        kind: Recommendation,
        conditions: &[when("potentially_redundant", Above, 0.0)],
        text: "Review workflows named like test/backup/copy/old/temp for redundancy",
    },
    FindingRule {
        kind: CriticalIssue,
        conditions: &[when("total_workflows", Exactly, 0.0)],
        text: "No workflows found — missing automation opportunities",
    },
];

const FORMS_RULES: &[FindingRule] = &[
    FindingRule {
        kind: Recommendation,
        conditions: &[when("total_forms", Below, 3.0)],
        text: "Create more forms to capture leads effectively",
    },
    FindingRule {
        kind: Recommendation,
        conditions: &[when("unembedded_percentage", Above, 40.0)],
        text: "Embed or publish more forms to maximize lead capture",
    },
    FindingRule {
        kind: Recommendation,
        conditions: &[when("unused_forms_percentage", Above, 50.0)],
        text: "Archive or refresh forms with no submissions in the last 30 days",
    },
    FindingRule {
        kind: Recommendation,
        conditions: &[when("common_fields_count", Above, 3.0)],
        text: "Consolidate forms that collect the same fields",
    },
    FindingRule {
        kind: CriticalIssue,
        conditions: &[
            when("sampled_forms", Above, 0.0),
            when("unused_forms_percentage", Exactly, 100.0),
        ],
        text: "None of the sampled forms received submissions in the last 30 days",
    },
];

const REPORTING_RULES: &[FindingRule] = &[
    FindingRule {
        kind: Recommendation,
        conditions: &[when("total_dashboards", Below, 2.0)],
        text: "Create dashboards for better performance monitoring",
    },
    FindingRule {
        kind: Recommendation,
        conditions: &[when("custom_reports", Exactly, 0.0)],
        text: "Build custom reports for specific business insights",
    },
    FindingRule {
        kind: CriticalIssue,
        conditions: &[when("total_dashboards", Exactly, 0.0)],
        text: "No dashboards found — performance monitoring missing",
    },
];

const SALES_RULES: &[FindingRule] = &[
    FindingRule {
        kind: Recommendation,
        conditions: &[when("total_pipelines", Below, 2.0)],
        text: "Consider creating additional pipelines for different sales processes",
    },
    FindingRule {
        kind: Recommendation,
        conditions: &[when("unassigned_deals_percentage", Above, 15.0)],
        text: "Assign ownership to unassigned deals",
    },
    FindingRule {
        kind: CriticalIssue,
        conditions: &[when("total_pipelines", Exactly, 0.0)],
        text: "No sales pipelines found — sales process not configured",
    },
];

pub const NO_FORMS_ISSUE: &str = "No forms found — lead capture system missing";
pub const NO_FORMS_RECOMMENDATION: &str = "Create forms to capture leads on your website";
const NO_FORMS_SCORE: f64 = 2.0;

pub fn rules_for(category: Category) -> &'static [FindingRule] {
    match category {
        Category::Admin => ADMIN_RULES,
        Category::Properties => PROPERTIES_RULES,
        Category::Workflows => WORKFLOWS_RULES,
        Category::Forms => FORMS_RULES,
        Category::Reporting => REPORTING_RULES,
        Category::Sales => SALES_RULES,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Findings {
    pub recommendations: Vec<String>,
    pub critical_issues: Vec<String>,
}

/// Evaluate every rule of `category`, then append dynamic suggestions.
pub fn classify(category: Category, metrics: &CategoryMetrics) -> Findings {
    let mut findings = Findings::default();

    for rule in rules_for(category) {
        if !rule.conditions.iter().all(|c| c.holds(metrics)) {
            continue;
        }
        match rule.kind {
            Recommendation => findings.recommendations.push(rule.text.to_string()),
            CriticalIssue => findings.critical_issues.push(rule.text.to_string()),
        }
    }

    if category == Category::Properties {
        findings
            .recommendations
            .extend(metrics.labels("consolidation_suggestions").iter().cloned());
    }

    findings
}

/// Fixed result for a portal without any form. No sampling happens.
pub fn no_forms_result(metrics: CategoryMetrics) -> CategoryResult {
    CategoryResult {
        score: Some(NO_FORMS_SCORE),
        grade: score_to_grade(NO_FORMS_SCORE),
        metrics,
        recommendations: vec![NO_FORMS_RECOMMENDATION.to_string()],
        critical_issues: vec![NO_FORMS_ISSUE.to_string()],
        status: CategoryStatus::Ok,
    }
}
