use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ai_intel_hub::alert::{render_alerts, scan_text};
use ai_intel_hub::config::load_keyword_rules;
use ai_intel_hub::time::{date_label, format_date, utc_now};
use ai_intel_hub::{inbox, pipeline, Settings};

#[derive(Parser)]
#[command(name = "ai-intel-hub")]
#[command(about = "Daily AI intelligence digest from RSS/Atom feeds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch all sources and write the day's report
    Report {
        /// Time window in hours (overrides REPORT_TIME_WINDOW_HOURS)
        #[arg(long)]
        hours: Option<u32>,

        /// Report date, YYYY-MM-DD (default: today in TIMEZONE)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Append inbox notes to the day's report
    Inbox {
        /// Report date, YYYY-MM-DD (default: today in TIMEZONE)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Scan a report for configured keywords
    Alert {
        /// File to scan (default: today's report)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Also write the alert list to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ai_intel_hub=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::from_env().context("invalid configuration")?;
    let now = utc_now();
    let today = date_label(now, settings.timezone);

    match cli.command {
        Command::Report { hours, date } => {
            if let Some(hours) = hours {
                settings.window_hours = hours;
            }
            let label = date.map(format_date).unwrap_or(today);
            let summary = pipeline::run_report(&settings, now, &label).await?;
            info!(
                "Report {} has {} entries, {} highlights",
                summary.report_path.display(),
                summary.total_entries,
                summary.highlight_count
            );
            if !summary.failed_sources.is_empty() {
                warn!("Failed sources: {}", summary.failed_sources.join(", "));
            }
        }
        Command::Inbox { date } => {
            let label = date.map(format_date).unwrap_or(today);
            let report_path = settings.report_path(&label);
            inbox::ingest(&settings.inbox_dir, &report_path, &label)?;
        }
        Command::Alert { file, output } => {
            let target = file.unwrap_or_else(|| settings.report_path(&today));
            let content = std::fs::read(&target)
                .with_context(|| format!("file not found: {}", target.display()))?;
            let content = String::from_utf8_lossy(&content);

            let rules = load_keyword_rules(&settings.keywords_path)?;
            if rules.is_empty() {
                info!(
                    "No keywords configured. Edit {}",
                    settings.keywords_path.display()
                );
            }

            let hits = scan_text(&content, &rules);
            let markdown = render_alerts(&today, &target, &hits);
            println!("{}", markdown);

            if let Some(out_path) = output {
                if let Some(parent) = out_path.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
                std::fs::write(&out_path, &markdown)
                    .with_context(|| format!("failed to write {}", out_path.display()))?;
                info!("Alerts written to {}", out_path.display());
            }
        }
    }

    Ok(())
}
