use chrono::{DateTime, Utc};
use feed_rs::parser;
use futures::stream::{self, StreamExt};
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::{debug, error, info};

use crate::config::Source;
use crate::error::{Error, FetchError, Result};
use crate::model::{Entry, FeedItem, SourceEntries};
use crate::normalize::{normalize_items, NormalizeOptions};
use crate::settings::Settings;

pub const FEED_ACCEPT: &str = "application/rss+xml, application/atom+xml, text/xml, */*";

pub struct Fetcher {
    client: Client,
    concurrency: usize,
}

impl Fetcher {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.http_timeout)
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|e| Error::Fetch(FetchError::Request(e)))?;

        Ok(Self {
            client,
            concurrency: settings.fetch_concurrency.max(1),
        })
    }

    /// Fetch every source, at most `concurrency` at a time, keeping source order.
    pub async fn collect_all(&self, sources: &[Source], opts: &NormalizeOptions) -> Vec<SourceEntries> {
        info!("Fetching {} sources", sources.len());

        stream::iter(sources)
            .map(|source| self.collect_source(source, opts))
            .buffered(self.concurrency)
            .collect()
            .await
    }

    /// Fetch and normalize one source. A failed fetch becomes a single placeholder entry.
    pub async fn collect_source(&self, source: &Source, opts: &NormalizeOptions) -> SourceEntries {
        match self.fetch_items(&source.url).await {
            Ok(items) => {
                let fetched = items.len();
                let entries = normalize_items(items, opts);
                info!(
                    "Kept {} of {} items for source '{}'",
                    entries.len(),
                    fetched,
                    source.name
                );
                SourceEntries {
                    source_name: source.name.clone(),
                    entries,
                    error: None,
                }
            }
            Err(e) => {
                error!("Failed to fetch source '{}': {}", source.name, e);
                SourceEntries {
                    source_name: source.name.clone(),
                    entries: vec![failure_entry(source, &e, opts.now)],
                    error: Some(e.to_string()),
                }
            }
        }
    }

    pub async fn fetch_items(&self, url: &str) -> std::result::Result<Vec<FeedItem>, FetchError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, FEED_ACCEPT)
            .send()
            .await
            .map_err(FetchError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let bytes = response.bytes().await.map_err(FetchError::Body)?;
        let parsed = parser::parse(&bytes[..])?;

        Ok(parsed
            .entries
            .into_iter()
            .map(FeedItem::from_feed_entry)
            .collect())
    }
}

/// Visible stand-in for a source that could not be fetched.
pub fn failure_entry(source: &Source, err: &FetchError, now: DateTime<Utc>) -> Entry {
    Entry {
        title: format!("[抓取失败] {}", source.name),
        link: source.url.trim().to_string(),
        summary: format!("错误：{}", err),
        timestamp: Some(now),
    }
}
