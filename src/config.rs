use std::collections::BTreeSet;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::warn;

use crate::error::{Error, Result};

/// A named feed source from the registry file.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Source {
    #[serde(default = "default_source_name")]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "type", default)]
    pub kind: SourceKind,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

fn default_source_name() -> String {
    "Unknown".to_string()
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Rss,
    #[default]
    #[serde(other)]
    Unsupported,
}

impl Source {
    /// Only RSS/Atom sources with a URL are fetched; everything else is skipped.
    pub fn is_fetchable(&self) -> bool {
        self.kind == SourceKind::Rss && !self.url.trim().is_empty()
    }

    pub fn has_any_tag(&self, wanted: &[&str]) -> bool {
        self.tags
            .iter()
            .any(|tag| wanted.iter().any(|w| tag.trim().eq_ignore_ascii_case(w)))
    }
}

/// A keyword that promotes matching entries into the highlights section.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    pub keyword: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct SourcesFile {
    #[serde(default)]
    sources: Vec<Source>,
}

#[derive(Debug, Deserialize, Default)]
struct KeywordsFile {
    #[serde(default, alias = "alerts")]
    keywords: Vec<KeywordRule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Format::Toml,
            _ => Format::Yaml,
        }
    }
}

/// Load the source registry. A missing file is fatal; a malformed one yields no sources.
pub fn load_sources<P: AsRef<Path>>(path: P) -> Result<Vec<Source>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::ConfigMissing(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(sources_from_str(&content, Format::from_path(path)))
}

/// Load keyword rules. A missing file means there are no rules.
pub fn load_keyword_rules<P: AsRef<Path>>(path: P) -> Result<Vec<KeywordRule>> {
    let path = path.as_ref();
    if !path.exists() {
        warn!("Keyword config {} not found, highlighting disabled", path.display());
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(keyword_rules_from_str(&content, Format::from_path(path)))
}

fn sources_from_str(content: &str, format: Format) -> Vec<Source> {
    parse_document::<SourcesFile>(content, format)
        .map(|file| file.sources)
        .unwrap_or_default()
}

fn keyword_rules_from_str(content: &str, format: Format) -> Vec<KeywordRule> {
    parse_document::<KeywordsFile>(content, format)
        .map(|file| {
            file.keywords
                .into_iter()
                .filter(|rule| !rule.keyword.trim().is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn parse_document<T: DeserializeOwned + Default>(content: &str, format: Format) -> Option<T> {
    if content.trim().is_empty() {
        return Some(T::default());
    }
    let parsed = match format {
        Format::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
    };
    match parsed {
        Ok(doc) => Some(doc),
        Err(e) => {
            warn!("Ignoring malformed config: {}", e);
            None
        }
    }
}
