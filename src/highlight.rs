use std::collections::BTreeSet;

use crate::config::KeywordRule;
use crate::model::{Entry, SourceEntries};

/// An entry promoted to the top of the report by keyword matches.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub entry: Entry,
    pub source_name: String,
    /// Sorted, case-folded, distinct
    pub matched: BTreeSet<String>,
}

impl Highlight {
    pub fn score(&self) -> usize {
        self.matched.len()
    }
}

/// Keywords from `rules` found in the entry's title or summary.
pub fn match_keywords(entry: &Entry, rules: &[KeywordRule]) -> BTreeSet<String> {
    let haystack = format!("{} {}", entry.title, entry.summary).to_lowercase();
    rules
        .iter()
        .map(|rule| rule.keyword.trim().to_lowercase())
        .filter(|keyword| !keyword.is_empty() && haystack.contains(keyword.as_str()))
        .collect()
}

/// Score every entry and return the best `limit`, highest score then newest first.
pub fn select_highlights(
    groups: &[SourceEntries],
    rules: &[KeywordRule],
    limit: usize,
) -> Vec<Highlight> {
    let mut scored: Vec<Highlight> = groups
        .iter()
        .flat_map(|group| {
            group.entries.iter().filter_map(move |entry| {
                let matched = match_keywords(entry, rules);
                (!matched.is_empty()).then(|| Highlight {
                    entry: entry.clone(),
                    source_name: group.source_name.clone(),
                    matched,
                })
            })
        })
        .collect();

    // Stable sort; full ties keep config and feed order.
    scored.sort_by(|a, b| {
        b.score()
            .cmp(&a.score())
            .then_with(|| b.entry.timestamp.cmp(&a.entry.timestamp))
    });
    scored.truncate(limit);
    scored
}
