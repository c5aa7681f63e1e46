//! Markdown rendering of the daily report.
//!
//! [`render`] is pure: identical input gives byte-identical output, always
//! terminated by exactly one newline.

use crate::categorize::CategoryBucket;
use crate::highlight::Highlight;
use crate::model::{Entry, SourceEntries};
use crate::time::format_timestamp;

const UNTITLED: &str = "(无标题)";
const NO_HIGHLIGHTS: &str = "- 暂无关键词命中";
const EMPTY_BUCKET: &str = "- (none)";
const NO_UPDATES: &str = "（今天暂无抓取到更新，可能源未更新或网络异常）";

pub struct ReportInput<'a> {
    pub date_label: &'a str,
    /// Time zone name shown in the header annotation
    pub timezone: &'a str,
    pub window_hours: u32,
    pub groups: &'a [SourceEntries],
    pub highlights: Option<&'a [Highlight]>,
    pub buckets: Option<&'a [CategoryBucket]>,
}

pub fn report_title(date_label: &str) -> String {
    format!("# AI 情报日报 - {}", date_label)
}

pub fn render(input: &ReportInput<'_>) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(report_title(input.date_label));
    lines.push(String::new());
    lines.push(format!(
        "> 时区：{} | 抓取窗口：近 {} 小时",
        input.timezone, input.window_hours
    ));
    lines.push(String::new());

    if let Some(highlights) = input.highlights {
        render_highlights(&mut lines, highlights);
    }
    if let Some(buckets) = input.buckets {
        render_buckets(&mut lines, buckets);
    }

    let total: usize = input.groups.iter().map(|g| g.entries.len()).sum();
    lines.push(format!("共收录 {} 条更新，按来源分组如下：", total));
    lines.push(String::new());

    for group in input.groups.iter().filter(|g| !g.entries.is_empty()) {
        lines.push(format!("## {} ({})", group.source_name, group.entries.len()));
        lines.push(String::new());
        for entry in &group.entries {
            render_entry(&mut lines, entry);
        }
        lines.push(String::new());
    }

    if total == 0 {
        lines.push(NO_UPDATES.to_string());
    }

    let mut out = lines.join("\n").trim_end().to_string();
    out.push('\n');
    out
}

fn render_highlights(lines: &mut Vec<String>, highlights: &[Highlight]) {
    lines.push("## 今日要点".to_string());
    lines.push(String::new());
    if highlights.is_empty() {
        lines.push(NO_HIGHLIGHTS.to_string());
    }
    for highlight in highlights {
        let mut line = format!(
            "- {} · {}",
            entry_link(&highlight.entry),
            highlight.source_name
        );
        if let Some(ts) = highlight.entry.timestamp {
            line.push_str(&format!(" · {}", format_timestamp(ts)));
        }
        let keywords: Vec<&str> = highlight.matched.iter().map(String::as_str).collect();
        line.push_str(&format!(" · 关键词：{}", keywords.join(", ")));
        lines.push(line);
    }
    lines.push(String::new());
}

fn render_buckets(lines: &mut Vec<String>, buckets: &[CategoryBucket]) {
    lines.push("## 分栏".to_string());
    lines.push(String::new());
    for bucket in buckets {
        lines.push(format!("### {} ({})", bucket.category, bucket.entries.len()));
        lines.push(String::new());
        if bucket.entries.is_empty() {
            lines.push(EMPTY_BUCKET.to_string());
        }
        for (source_name, entry) in &bucket.entries {
            lines.push(format!("- {} · {}", entry_link(entry), source_name));
        }
        lines.push(String::new());
    }
}

fn render_entry(lines: &mut Vec<String>, entry: &Entry) {
    // Two trailing spaces force a markdown line break.
    lines.push(format!("- {}  ", entry_link(entry)));
    if let Some(ts) = entry.timestamp {
        lines.push(format!("  - 时间：{}", format_timestamp(ts)));
    }
    if !entry.summary.is_empty() {
        lines.push(format!("  - 摘要：{}", entry.summary));
    }
}

fn entry_link(entry: &Entry) -> String {
    let title = if entry.title.is_empty() {
        UNTITLED
    } else {
        entry.title.as_str()
    };
    format!("[{}]({})", title, entry.link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorize::Category;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeSet;

    fn entry(title: &str, summary: &str) -> Entry {
        Entry {
            title: title.to_string(),
            link: format!("https://example.com/{}", title.len()),
            summary: summary.to_string(),
            timestamp: Some(Utc.with_ymd_and_hms(2025, 10, 16, 8, 30, 0).unwrap()),
        }
    }

    fn group(name: &str, entries: Vec<Entry>) -> SourceEntries {
        SourceEntries {
            source_name: name.to_string(),
            entries,
            error: None,
        }
    }

    fn input<'a>(groups: &'a [SourceEntries]) -> ReportInput<'a> {
        ReportInput {
            date_label: "2025-10-16",
            timezone: "Asia/Shanghai",
            window_hours: 24,
            groups,
            highlights: None,
            buckets: None,
        }
    }

    #[test]
    fn test_grouped_report_layout() {
        let groups = vec![group("TestFeed", vec![entry("Hello", "A summary")])];
        let out = render(&input(&groups));

        let expected = "# AI 情报日报 - 2025-10-16\n\
            \n\
            > 时区：Asia/Shanghai | 抓取窗口：近 24 小时\n\
            \n\
            共收录 1 条更新，按来源分组如下：\n\
            \n\
            ## TestFeed (1)\n\
            \n\
            - [Hello](https://example.com/5)  \n  \
            - 时间：2025-10-16 08:30 UTC\n  \
            - 摘要：A summary\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_empty_report_has_fallback_line() {
        let groups = vec![group("Quiet", vec![])];
        let out = render(&input(&groups));

        assert!(out.contains("共收录 0 条更新"));
        assert!(!out.contains("## Quiet"));
        assert!(out.ends_with("（今天暂无抓取到更新，可能源未更新或网络异常）\n"));
    }

    #[test]
    fn test_ends_with_single_newline() {
        let groups = vec![group("A", vec![entry("x", "")])];
        let out = render(&input(&groups));
        assert!(out.ends_with('\n'));
        assert!(!out.ends_with("\n\n"));
    }

    #[test]
    fn test_optional_lines_omitted() {
        let mut e = entry("No extras", "");
        e.timestamp = None;
        e.title = String::new();
        let groups = vec![group("A", vec![e])];
        let out = render(&input(&groups));

        assert!(out.contains("- [(无标题)](https://example.com/9)"));
        assert!(!out.contains("时间："));
        assert!(!out.contains("摘要："));
    }

    #[test]
    fn test_section_order() {
        let groups = vec![group("Lab", vec![entry("New GPT model released", "")])];
        let highlights = vec![Highlight {
            entry: groups[0].entries[0].clone(),
            source_name: "Lab".to_string(),
            matched: BTreeSet::from(["gpt".to_string()]),
        }];
        let buckets: Vec<CategoryBucket> = Category::ALL
            .iter()
            .map(|&category| CategoryBucket {
                category,
                entries: Vec::new(),
            })
            .collect();

        let mut report = input(&groups);
        report.highlights = Some(highlights.as_slice());
        report.buckets = Some(buckets.as_slice());
        let out = render(&report);

        let title = out.find("# AI 情报日报").unwrap();
        let window = out.find("抓取窗口").unwrap();
        let highlight_section = out.find("## 今日要点").unwrap();
        let columns = out.find("## 分栏").unwrap();
        let total = out.find("共收录").unwrap();
        let source_group = out.find("## Lab (1)").unwrap();
        assert!(title < window);
        assert!(window < highlight_section);
        assert!(highlight_section < columns);
        assert!(columns < total);
        assert!(total < source_group);
    }

    #[test]
    fn test_highlight_line() {
        let groups = vec![group("Lab", vec![])];
        let highlights = vec![Highlight {
            entry: entry("New GPT model released", ""),
            source_name: "Lab".to_string(),
            matched: BTreeSet::from(["llm".to_string(), "gpt".to_string()]),
        }];
        let mut report = input(&groups);
        report.highlights = Some(highlights.as_slice());
        let out = render(&report);

        assert!(out.contains(
            "- [New GPT model released](https://example.com/22) · Lab · 2025-10-16 08:30 UTC · 关键词：gpt, llm\n"
        ));
    }

    #[test]
    fn test_empty_highlights_placeholder() {
        let groups = vec![];
        let highlights: Vec<Highlight> = Vec::new();
        let mut report = input(&groups);
        report.highlights = Some(highlights.as_slice());
        let out = render(&report);
        assert!(out.contains("## 今日要点\n\n- 暂无关键词命中\n"));
    }

    #[test]
    fn test_bucket_counts_and_placeholders() {
        let groups = vec![];
        let buckets = vec![
            CategoryBucket {
                category: Category::ResearchPapers,
                entries: vec![("Random Lab".to_string(), entry("Paper", ""))],
            },
            CategoryBucket {
                category: Category::Other,
                entries: vec![],
            },
        ];
        let mut report = input(&groups);
        report.buckets = Some(buckets.as_slice());
        let out = render(&report);

        assert!(out.contains("### Research & Papers (1)\n\n- [Paper](https://example.com/5) · Random Lab\n"));
        assert!(out.contains("### Other/Misc (0)\n\n- (none)\n"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let groups = vec![
            group("A", vec![entry("one", "s1"), entry("two", "")]),
            group("B", vec![entry("three", "s3")]),
        ];
        let first = render(&input(&groups));
        let second = render(&input(&groups));
        assert_eq!(first, second);
    }
}
