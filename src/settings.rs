use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;

use crate::error::{Error, Result};

/// What to do when the day's report file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Append,
    Overwrite,
}

impl FromStr for WriteMode {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "append" => Ok(WriteMode::Append),
            "overwrite" => Ok(WriteMode::Overwrite),
            _ => Err(()),
        }
    }
}

/// Run configuration for the pipeline.
#[derive(Debug, Clone)]
pub struct Settings {
    pub window_hours: u32,
    pub max_items_per_source: usize,
    pub http_timeout: Duration,
    pub user_agent: String,
    pub timezone: Tz,
    pub summary_max_chars: usize,
    pub highlight_limit: usize,
    /// Number of sources fetched at the same time
    pub fetch_concurrency: usize,
    pub write_mode: WriteMode,
    pub sources_path: PathBuf,
    pub keywords_path: PathBuf,
    pub reports_dir: PathBuf,
    pub inbox_dir: PathBuf,
    pub index_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_hours: 24,
            max_items_per_source: 20,
            http_timeout: Duration::from_secs(15),
            user_agent: "ai-intelligence-hub/1.0".to_string(),
            timezone: chrono_tz::Asia::Shanghai,
            summary_max_chars: 400,
            highlight_limit: 5,
            fetch_concurrency: 4,
            write_mode: WriteMode::Append,
            sources_path: PathBuf::from("config/sources.yml"),
            keywords_path: PathBuf::from("config/alerts_keywords.yml"),
            reports_dir: PathBuf::from("daily_reports"),
            inbox_dir: PathBuf::from("inbox"),
            index_path: PathBuf::from("README.md"),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Settings::default();

        if let Some(v) = get("REPORT_TIME_WINDOW_HOURS") {
            settings.window_hours = parse_value("REPORT_TIME_WINDOW_HOURS", &v)?;
        }
        if let Some(v) = get("MAX_ITEMS_PER_SOURCE") {
            settings.max_items_per_source = parse_value("MAX_ITEMS_PER_SOURCE", &v)?;
        }
        if let Some(v) = get("HTTP_TIMEOUT") {
            settings.http_timeout = Duration::from_secs(parse_value("HTTP_TIMEOUT", &v)?);
        }
        if let Some(v) = get("USER_AGENT") {
            settings.user_agent = v;
        }
        if let Some(v) = get("TIMEZONE") {
            settings.timezone = parse_value("TIMEZONE", &v)?;
        }
        if let Some(v) = get("SUMMARY_MAX_CHARS") {
            settings.summary_max_chars = parse_value("SUMMARY_MAX_CHARS", &v)?;
        }
        if let Some(v) = get("HIGHLIGHT_LIMIT") {
            settings.highlight_limit = parse_value("HIGHLIGHT_LIMIT", &v)?;
        }
        if let Some(v) = get("FETCH_CONCURRENCY") {
            let n: usize = parse_value("FETCH_CONCURRENCY", &v)?;
            if n == 0 {
                return Err(invalid("FETCH_CONCURRENCY", &v));
            }
            settings.fetch_concurrency = n;
        }
        if let Some(v) = get("REPORT_WRITE_MODE") {
            settings.write_mode = parse_value("REPORT_WRITE_MODE", &v)?;
        }
        if let Some(v) = get("SOURCES_CONFIG") {
            settings.sources_path = PathBuf::from(v);
        }
        if let Some(v) = get("KEYWORDS_CONFIG") {
            settings.keywords_path = PathBuf::from(v);
        }
        if let Some(v) = get("REPORTS_DIR") {
            settings.reports_dir = PathBuf::from(v);
        }
        if let Some(v) = get("INBOX_DIR") {
            settings.inbox_dir = PathBuf::from(v);
        }
        if let Some(v) = get("INDEX_FILE") {
            settings.index_path = PathBuf::from(v);
        }

        Ok(settings)
    }

    pub fn report_path(&self, date_label: &str) -> PathBuf {
        self.reports_dir.join(format!("{}.md", date_label))
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

fn invalid(key: &'static str, value: &str) -> Error {
    Error::InvalidSetting {
        key,
        value: value.to_string(),
    }
}
