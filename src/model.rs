use chrono::{DateTime, Utc};

/// A feed item as parsed, before any cleanup or filtering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    /// Summary or description; may contain markup
    pub summary: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

impl FeedItem {
    pub fn from_feed_entry(entry: feed_rs::model::Entry) -> Self {
        let summary = entry
            .summary
            .map(|text| text.content)
            .or_else(|| entry.content.and_then(|content| content.body));

        Self {
            title: entry.title.map(|text| text.content),
            link: entry.links.into_iter().next().map(|link| link.href),
            summary,
            published: entry.published,
            updated: entry.updated,
        }
    }
}

/// A normalized entry ready for the report.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub title: String,
    pub link: String,
    /// Plain text, already length-capped
    pub summary: String,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Everything one source contributed to a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEntries {
    pub source_name: String,
    pub entries: Vec<Entry>,
    /// Set when the fetch failed and `entries` holds the placeholder
    pub error: Option<String>,
}

impl SourceEntries {
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}
