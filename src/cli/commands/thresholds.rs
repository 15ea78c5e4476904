use anyhow::Result;
use std::fmt::Write;

use super::Command;
use crate::audit::thresholds::{ThresholdRange, TierRule};
use crate::audit::{Category, ScoringThresholds};
use crate::cli::OutputFormat;
use crate::config::config;

/// Print the scoring table in effect
pub struct ThresholdsCommand {
    format: OutputFormat,
}

impl ThresholdsCommand {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn render(&self, thresholds: &ScoringThresholds) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(thresholds)? + "\n"),
            OutputFormat::Text => {
                let mut out = String::new();
                writeln!(out, "📏 SCORING THRESHOLDS")?;
                writeln!(out, "=====================")?;
                writeln!(
                    out,
                    "Tiers are checked excellent (5.0) then good (3.5); anything else scores poor (2.0)."
                )?;
                for category in Category::ALL {
                    let tiers = thresholds.for_category(category);
                    writeln!(out)?;
                    writeln!(out, "{}", category.title())?;
                    writeln!(out, "   excellent: {}", describe_rule(&tiers.excellent))?;
                    writeln!(out, "   good:      {}", describe_rule(&tiers.good))?;
                    writeln!(out, "   poor:      {}", describe_rule(&tiers.poor))?;
                }
                Ok(out)
            }
        }
    }
}

fn describe_range(range: &ThresholdRange) -> String {
    match range.max {
        Some(max) if max == range.min => format!("{}", range.min),
        Some(max) => format!("{}-{}", range.min, max),
        None => format!(">= {}", range.min),
    }
}

fn describe_rule(rule: &TierRule) -> String {
    let parts: Vec<String> = rule
        .ranges()
        .map(|(metric, range)| format!("{metric} {}", describe_range(range)))
        .collect();
    if parts.is_empty() {
        "(fallback)".to_string()
    } else {
        parts.join(", ")
    }
}

impl Command for ThresholdsCommand {
    async fn execute(&self) -> Result<()> {
        let thresholds = ScoringThresholds::from_settings(&config()?.audit)?;
        print!("{}", self.render(&thresholds)?);
        Ok(())
    }
}
