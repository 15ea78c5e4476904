use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "hubspot-audit")]
#[command(about = "Score the configuration health of a HubSpot portal")]
#[command(long_about = "hubspot-audit pulls users, properties, workflows, forms, reporting and \
                       sales pipelines from a HubSpot portal, scores each area against tiered \
                       thresholds and reports an overall grade. Start with 'hubspot-audit audit'.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a full audit of the portal and print the report
    Audit {
        /// Report format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
        /// Audit a recorded JSON snapshot instead of the live API
        #[arg(long, help = "Read portal data from a snapshot file instead of calling HubSpot")]
        snapshot: Option<PathBuf>,
        /// Write the report to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        /// Store the result in the audit history under this e-mail address
        #[arg(long, help = "Persist the result for this e-mail (requires the database feature)")]
        email: Option<String>,
        /// Company name stored alongside the e-mail address
        #[arg(long)]
        company: Option<String>,
        /// HubSpot portal (hub) id recorded with the stored result
        #[arg(long)]
        portal_id: Option<String>,
        /// Include every metric in the text report
        #[arg(long, short = 'v')]
        verbose: bool,
        /// Append the executive summary, risk level and action plan
        #[arg(long)]
        summary: bool,
    },
    /// Show the scoring thresholds in effect
    Thresholds {
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// List stored audits for an e-mail address
    History {
        #[arg(long)]
        email: String,
        /// Maximum number of audits to list
        #[arg(long, default_value = "10")]
        limit: u32,
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Print the effective configuration with the access token masked
    Config,
}
