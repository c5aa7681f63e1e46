//! Quick keyword scan over a finished report.

use std::path::Path;

use crate::config::KeywordRule;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertHit {
    pub keyword: String,
    pub tags: Vec<String>,
}

/// Rules whose keyword occurs anywhere in `content`, in rule order.
pub fn scan_text(content: &str, rules: &[KeywordRule]) -> Vec<AlertHit> {
    let lowered = content.to_lowercase();
    rules
        .iter()
        .filter_map(|rule| {
            let keyword = rule.keyword.trim();
            if keyword.is_empty() || !lowered.contains(&keyword.to_lowercase()) {
                return None;
            }
            Some(AlertHit {
                keyword: keyword.to_string(),
                tags: rule.tags.clone(),
            })
        })
        .collect()
}

pub fn render_alerts(date_label: &str, target: &Path, hits: &[AlertHit]) -> String {
    let mut lines = vec![
        format!("# 关键词告警 - {}", date_label),
        String::new(),
        format!("目标文件：{}", target.display()),
        String::new(),
    ];
    if hits.is_empty() {
        lines.push("- 未命中任何关键词".to_string());
    }
    for hit in hits {
        let tags = if hit.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", hit.tags.join(", "))
        };
        lines.push(format!("- 命中关键词：{}{}", hit.keyword, tags));
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
