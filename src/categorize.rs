//! Fixed topical columns, assigned per source.

use std::fmt;

use crate::config::Source;
use crate::model::{Entry, SourceEntries};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    ModelsPlatforms,
    ResearchPapers,
    CompaniesProducts,
    ToolsFrameworks,
    Other,
}

impl Category {
    /// Output order of the columns section.
    pub const ALL: [Category; 5] = [
        Category::ModelsPlatforms,
        Category::ResearchPapers,
        Category::CompaniesProducts,
        Category::ToolsFrameworks,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::ModelsPlatforms => "Models & Platforms",
            Category::ResearchPapers => "Research & Papers",
            Category::CompaniesProducts => "Companies & Products",
            Category::ToolsFrameworks => "Tools & Frameworks",
            Category::Other => "Other/Misc",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const PLATFORM_NAMES: &[&str] = &[
    "openai",
    "anthropic",
    "deepmind",
    "google ai",
    "meta ai",
    "mistral",
    "hugging face",
    "huggingface",
    "nvidia",
    "microsoft",
    "cohere",
    "stability ai",
];

type Rule = (fn(&Source) -> bool, Category);

/// Evaluated top to bottom; the first match wins.
const RULES: &[Rule] = &[
    (is_platform_name, Category::ModelsPlatforms),
    (has_platform_tag, Category::ModelsPlatforms),
    (has_research_tag, Category::ResearchPapers),
    (has_company_tag, Category::CompaniesProducts),
    (has_tools_tag, Category::ToolsFrameworks),
];

fn is_platform_name(source: &Source) -> bool {
    let name = source.name.to_lowercase();
    PLATFORM_NAMES.iter().any(|platform| name.contains(platform))
}

fn has_platform_tag(source: &Source) -> bool {
    source.has_any_tag(&["llm", "platform"])
}

fn has_research_tag(source: &Source) -> bool {
    source.has_any_tag(&["research", "arxiv"])
}

fn has_company_tag(source: &Source) -> bool {
    source.has_any_tag(&["company"])
}

fn has_tools_tag(source: &Source) -> bool {
    source.has_any_tag(&["tools"])
}

pub fn categorize(source: &Source) -> Category {
    RULES
        .iter()
        .find(|(matches, _)| matches(source))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Other)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBucket {
    pub category: Category,
    /// (source name, entry) in source order
    pub entries: Vec<(String, Entry)>,
}

/// One bucket per category, in `Category::ALL` order, empty ones included.
///
/// `groups` line up with `sources` by position, as `Fetcher::collect_all`
/// returns them; a group past the end of `sources` lands in `Other`.
pub fn bucket_entries(sources: &[Source], groups: &[SourceEntries]) -> Vec<CategoryBucket> {
    let mut buckets: Vec<CategoryBucket> = Category::ALL
        .iter()
        .map(|&category| CategoryBucket {
            category,
            entries: Vec::new(),
        })
        .collect();

    for (i, group) in groups.iter().enumerate() {
        let category = sources.get(i).map(categorize).unwrap_or(Category::Other);

        if let Some(bucket) = buckets.iter_mut().find(|b| b.category == category) {
            bucket.entries.extend(
                group
                    .entries
                    .iter()
                    .map(|entry| (group.source_name.clone(), entry.clone())),
            );
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceKind;

    fn source(name: &str, tags: &[&str]) -> Source {
        Source {
            name: name.to_string(),
            url: format!("https://{}.example.com/rss", name.len()),
            kind: SourceKind::Rss,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn entry(title: &str) -> Entry {
        Entry {
            title: title.to_string(),
            link: String::new(),
            summary: String::new(),
            timestamp: None,
        }
    }

    mod rule_tests {
        use super::*;

        #[test]
        fn test_platform_name_wins_over_tags() {
            let s = source("OpenAI News", &["research"]);
            assert_eq!(categorize(&s), Category::ModelsPlatforms);
        }

        #[test]
        fn test_platform_name_ignores_case() {
            assert_eq!(categorize(&source("HUGGING FACE Blog", &[])), Category::ModelsPlatforms);
        }

        #[test]
        fn test_llm_tag() {
            assert_eq!(categorize(&source("Some Blog", &["llm"])), Category::ModelsPlatforms);
            assert_eq!(categorize(&source("Some Blog", &["platform"])), Category::ModelsPlatforms);
        }

        #[test]
        fn test_research_tags_regardless_of_name() {
            let s = source("Random Lab", &["research", "arxiv"]);
            assert_eq!(categorize(&s), Category::ResearchPapers);
        }

        #[test]
        fn test_llm_beats_research() {
            let s = source("Random Lab", &["arxiv", "llm"]);
            assert_eq!(categorize(&s), Category::ModelsPlatforms);
        }

        #[test]
        fn test_company_and_tools() {
            assert_eq!(categorize(&source("Acme", &["company"])), Category::CompaniesProducts);
            assert_eq!(categorize(&source("Acme", &["tools"])), Category::ToolsFrameworks);
            assert_eq!(
                categorize(&source("Acme", &["tools", "company"])),
                Category::CompaniesProducts
            );
        }

        #[test]
        fn test_fallback_is_other() {
            assert_eq!(categorize(&source("Personal Blog", &["misc"])), Category::Other);
            assert_eq!(categorize(&source("Personal Blog", &[])), Category::Other);
        }

        #[test]
        fn test_categorize_is_deterministic() {
            let s = source("Random Lab", &["tools", "research"]);
            assert_eq!(categorize(&s), categorize(&s.clone()));
        }
    }

    mod bucket_tests {
        use super::*;

        #[test]
        fn test_buckets_in_fixed_order_including_empty() {
            let buckets = bucket_entries(&[], &[]);
            let order: Vec<_> = buckets.iter().map(|b| b.category).collect();
            assert_eq!(order, Category::ALL.to_vec());
            assert!(buckets.iter().all(|b| b.entries.is_empty()));
        }

        #[test]
        fn test_entries_follow_their_source() {
            let sources = vec![source("Random Lab", &["research"]), source("Acme", &["tools"])];
            let groups = vec![
                SourceEntries {
                    source_name: "Random Lab".to_string(),
                    entries: vec![entry("paper 1"), entry("paper 2")],
                    error: None,
                },
                SourceEntries {
                    source_name: "Acme".to_string(),
                    entries: vec![entry("release")],
                    error: None,
                },
            ];

            let buckets = bucket_entries(&sources, &groups);

            assert_eq!(buckets[1].category, Category::ResearchPapers);
            assert_eq!(buckets[1].entries.len(), 2);
            assert_eq!(buckets[1].entries[0].0, "Random Lab");
            assert_eq!(buckets[3].category, Category::ToolsFrameworks);
            assert_eq!(buckets[3].entries[0].1.title, "release");
            assert!(buckets[0].entries.is_empty());
        }

        #[test]
        fn test_duplicate_names_use_their_own_record() {
            let sources = vec![source("Blog", &["research"]), source("Blog", &["tools"])];
            let groups = vec![
                SourceEntries {
                    source_name: "Blog".to_string(),
                    entries: vec![entry("paper")],
                    error: None,
                },
                SourceEntries {
                    source_name: "Blog".to_string(),
                    entries: vec![entry("cli release")],
                    error: None,
                },
            ];

            let buckets = bucket_entries(&sources, &groups);

            assert_eq!(buckets[1].entries.len(), 1);
            assert_eq!(buckets[1].entries[0].1.title, "paper");
            assert_eq!(buckets[3].entries.len(), 1);
            assert_eq!(buckets[3].entries[0].1.title, "cli release");
        }

        #[test]
        fn test_unknown_group_goes_to_other() {
            let groups = vec![SourceEntries {
                source_name: "Ghost".to_string(),
                entries: vec![entry("boo")],
                error: None,
            }];
            let buckets = bucket_entries(&[], &groups);
            assert_eq!(buckets[4].entries.len(), 1);
        }
    }
}
