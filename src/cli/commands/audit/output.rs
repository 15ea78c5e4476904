use anyhow::Result;
use std::fmt::Write;

use crate::audit::metrics::MetricValue;
use crate::audit::{AuditResults, CategoryResult, CategoryStatus, Grade};
use crate::cli::OutputFormat;

/// Renders audit results for the terminal or as JSON
pub struct AuditOutput {
    format: OutputFormat,
    verbose: bool,
}

impl AuditOutput {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    pub fn render(&self, results: &AuditResults) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(results)? + "\n"),
            OutputFormat::Text => self.render_text(results),
        }
    }

    fn render_text(&self, results: &AuditResults) -> Result<String> {
        let mut out = String::new();

        writeln!(out, "📋 HUBSPOT PORTAL AUDIT")?;
        writeln!(out, "=======================")?;
        writeln!(out)?;
        writeln!(
            out,
            "Overall score: {:.1} / 5.0  (grade {} - {})",
            results.overall_score,
            results.overall_grade,
            results.overall_grade.describe()
        )?;
        writeln!(out)?;

        writeln!(out, "📊 CATEGORY SCORES:")?;
        writeln!(out, "───────────────────")?;
        for (category, result) in results.categories() {
            writeln!(
                out,
                "{} {:<18} {}",
                status_icon(result),
                category.title(),
                score_cell(result)
            )?;
        }
        writeln!(out)?;

        writeln!(out, "🔍 FINDINGS:")?;
        writeln!(out, "────────────")?;
        for (category, result) in results.categories() {
            if result.critical_issues.is_empty()
                && result.recommendations.is_empty()
                && !self.verbose
            {
                continue;
            }
            writeln!(out, "{}", category.title())?;
            for issue in &result.critical_issues {
                writeln!(out, "   ❌ {issue}")?;
            }
            for recommendation in &result.recommendations {
                writeln!(out, "   💡 {recommendation}")?;
            }
            if self.verbose {
                for (name, value) in result.metrics.iter() {
                    writeln!(out, "   · {name}: {}", metric_cell(value))?;
                }
            }
        }

        if let Some(enrichment) = &results.enrichment {
            writeln!(out)?;
            writeln!(out, "🧠 SUMMARY:")?;
            writeln!(out, "───────────")?;
            writeln!(out, "{}", enrichment.executive_summary)?;
            writeln!(out, "Risk: {}", enrichment.risk_assessment)?;
            if !enrichment.action_plan.is_empty() {
                writeln!(out)?;
                writeln!(out, "🗺️  ACTION PLAN:")?;
                writeln!(out, "───────────────")?;
                for (index, item) in enrichment.action_plan.iter().enumerate() {
                    writeln!(
                        out,
                        "{:>2}. [{} · {}] {} ({}, effort {}, impact {})",
                        index + 1,
                        item.priority,
                        item.timeline,
                        item.action,
                        item.category.title(),
                        item.effort,
                        item.impact
                    )?;
                }
            }
        }

        Ok(out)
    }
}

fn status_icon(result: &CategoryResult) -> &'static str {
    match result.status {
        CategoryStatus::InsufficientPermissions => "🔒",
        CategoryStatus::ApiError => "⚠️",
        CategoryStatus::DataUnavailable => "ℹ️",
        CategoryStatus::Ok => match result.grade {
            Grade::A | Grade::B => "✅",
            Grade::C => "⚠️",
            _ => "❌",
        },
    }
}

/// Score and grade, or `N/A` with what to do about it
fn score_cell(result: &CategoryResult) -> String {
    match result.score {
        Some(score) if result.is_scored() => format!("{score:.1}  {}", result.grade),
        _ => format!(
            "N/A  {}",
            result.status.guidance().unwrap_or("Not assessed")
        ),
    }
}

fn metric_cell(value: &MetricValue) -> String {
    match value {
        MetricValue::Count(n) => n.to_string(),
        MetricValue::Percentage(p) => format!("{p:.1}%"),
        MetricValue::Labels(labels) if labels.is_empty() => "-".to_string(),
        MetricValue::Labels(labels) => labels.join(", "),
        MetricValue::Samples(samples) => format!("{} sampled", samples.len()),
    }
}
