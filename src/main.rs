use anyhow::Result;
use clap::Parser;

use hubspot_audit::cli::commands::audit::AuditCommand;
use hubspot_audit::cli::commands::config::ConfigCommand;
use hubspot_audit::cli::commands::history::HistoryCommand;
use hubspot_audit::cli::commands::thresholds::ThresholdsCommand;
use hubspot_audit::cli::commands::{show_how_to_start, Command};
use hubspot_audit::cli::{Cli, Commands};
use hubspot_audit::{init_config, init_telemetry};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = init_config()?;
    if let Err(e) = init_telemetry(&config.observability) {
        eprintln!("⚠️  Logging disabled: {e}");
    }

    match cli.command {
        None => tokio::runtime::Runtime::new()?.block_on(async { show_how_to_start().await }),
        Some(Commands::Audit {
            format,
            snapshot,
            output,
            email,
            company,
            portal_id,
            verbose,
            summary,
        }) => tokio::runtime::Runtime::new()?.block_on(async {
            AuditCommand::new(format, verbose)
                .with_snapshot(snapshot)
                .with_output(output)
                .with_owner(email, company, portal_id)
                .with_summary(summary)
                .execute()
                .await
        }),
        Some(Commands::Thresholds { format }) => tokio::runtime::Runtime::new()?
            .block_on(async { ThresholdsCommand::new(format).execute().await }),
        Some(Commands::History {
            email,
            limit,
            format,
        }) => tokio::runtime::Runtime::new()?
            .block_on(async { HistoryCommand::new(email, limit, format).execute().await }),
        Some(Commands::Config) => {
            tokio::runtime::Runtime::new()?.block_on(async { ConfigCommand.execute().await })
        }
    }
}
