//! Turns raw feed items into report entries.

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Entry, FeedItem};

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

const ELLIPSIS: char = '…';

#[derive(Debug, Clone, Copy)]
pub struct NormalizeOptions {
    pub now: DateTime<Utc>,
    pub window_hours: u32,
    pub max_items: usize,
    pub summary_max_chars: usize,
}

impl NormalizeOptions {
    /// Saturates at the earliest representable instant for very large windows.
    pub fn window_start(&self) -> DateTime<Utc> {
        self.now
            .checked_sub_signed(Duration::hours(i64::from(self.window_hours)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// `window_start <= t <= now`
    pub fn in_window(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.window_start() && timestamp <= self.now
    }
}

/// Cap, date-filter and clean the items of one feed, keeping feed order.
pub fn normalize_items(items: Vec<FeedItem>, opts: &NormalizeOptions) -> Vec<Entry> {
    items
        .into_iter()
        .take(opts.max_items)
        .filter_map(|item| normalize_item(item, opts))
        .collect()
}

fn normalize_item(item: FeedItem, opts: &NormalizeOptions) -> Option<Entry> {
    let timestamp = resolve_timestamp(&item)?;
    if !opts.in_window(timestamp) {
        return None;
    }

    Some(Entry {
        title: item.title.as_deref().unwrap_or_default().trim().to_string(),
        link: item.link.as_deref().unwrap_or_default().trim().to_string(),
        summary: extract_text(item.summary.as_deref().unwrap_or_default(), opts.summary_max_chars),
        timestamp: Some(timestamp),
    })
}

/// Published time wins over updated time. Items with neither are never in a window.
pub fn resolve_timestamp(item: &FeedItem) -> Option<DateTime<Utc>> {
    item.published.or(item.updated)
}

/// Markup to plain text, whitespace collapsed, capped at `max_chars` characters.
pub fn extract_text(html: &str, max_chars: usize) -> String {
    let without_tags = RE_TAGS.replace_all(html, " ");
    let decoded = html_escape::decode_html_entities(&without_tags);
    let collapsed = RE_WS.replace_all(decoded.trim(), " ");
    truncate_chars(&collapsed, max_chars)
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max_chars - 1).collect();
    out.push(ELLIPSIS);
    out
}
