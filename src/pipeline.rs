use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::categorize::bucket_entries;
use crate::config::{load_keyword_rules, load_sources, Source};
use crate::error::{Error, Result};
use crate::fetcher::Fetcher;
use crate::highlight::select_highlights;
use crate::index::update_latest;
use crate::normalize::NormalizeOptions;
use crate::report::{render, ReportInput};
use crate::settings::{Settings, WriteMode};

/// A rendered report that has not been written anywhere yet.
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub date_label: String,
    pub markdown: String,
    pub total_entries: usize,
    pub failed_sources: Vec<String>,
    pub highlight_count: usize,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub report_path: PathBuf,
    pub total_entries: usize,
    pub failed_sources: Vec<String>,
    pub highlight_count: usize,
}

/// Fetch, normalize, rank and render; no files are written.
pub async fn generate_report(
    settings: &Settings,
    now: DateTime<Utc>,
    date_label: &str,
) -> Result<GeneratedReport> {
    let sources: Vec<Source> = load_sources(&settings.sources_path)?
        .into_iter()
        .filter(Source::is_fetchable)
        .collect();
    info!("Loaded {} RSS sources from {}", sources.len(), settings.sources_path.display());

    let rules = load_keyword_rules(&settings.keywords_path)?;

    let opts = NormalizeOptions {
        now,
        window_hours: settings.window_hours,
        max_items: settings.max_items_per_source,
        summary_max_chars: settings.summary_max_chars,
    };
    let fetcher = Fetcher::new(settings)?;
    let groups = fetcher.collect_all(&sources, &opts).await;

    let highlights = select_highlights(&groups, &rules, settings.highlight_limit);
    let buckets = bucket_entries(&sources, &groups);

    let markdown = render(&ReportInput {
        date_label,
        timezone: settings.timezone.name(),
        window_hours: settings.window_hours,
        groups: &groups,
        highlights: Some(highlights.as_slice()),
        buckets: Some(buckets.as_slice()),
    });

    let failed_sources: Vec<String> = groups
        .iter()
        .filter(|g| g.is_failed())
        .map(|g| g.source_name.clone())
        .collect();
    if !failed_sources.is_empty() {
        warn!("{} sources failed: {}", failed_sources.len(), failed_sources.join(", "));
    }

    Ok(GeneratedReport {
        date_label: date_label.to_string(),
        markdown,
        total_entries: groups.iter().map(|g| g.entries.len()).sum(),
        failed_sources,
        highlight_count: highlights.len(),
    })
}

/// Generate the report for `date_label`, write it, and update the index file.
pub async fn run_report(
    settings: &Settings,
    now: DateTime<Utc>,
    date_label: &str,
) -> Result<RunSummary> {
    let report = generate_report(settings, now, date_label).await?;

    let report_path = settings.report_path(date_label);
    write_report(&report_path, &report.markdown, settings.write_mode)?;
    info!("Generated report: {}", report_path.display());

    update_latest(&settings.index_path, &settings.reports_dir, date_label)?;

    Ok(RunSummary {
        report_path,
        total_entries: report.total_entries,
        failed_sources: report.failed_sources,
        highlight_count: report.highlight_count,
    })
}

/// Write `content` to `path`. In append mode an existing report gets the new one after a blank line.
pub fn write_report(path: &Path, content: &str, mode: WriteMode) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::write(parent, e))?;
    }

    let has_content = std::fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false);
    match mode {
        WriteMode::Append if has_content => {
            let mut file = OpenOptions::new()
                .append(true)
                .open(path)
                .map_err(|e| Error::write(path, e))?;
            write!(file, "\n{}", content).map_err(|e| Error::write(path, e))
        }
        _ => std::fs::write(path, content).map_err(|e| Error::write(path, e)),
    }
}
