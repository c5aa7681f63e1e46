//! The "latest report" pointer block in the landing document.

use std::path::{Component, Path};

use tracing::info;

use crate::error::{Error, Result};

pub const LATEST_START: &str = "<!--LATEST_START-->";
pub const LATEST_END: &str = "<!--LATEST_END-->";

pub fn latest_line(date_label: &str, link: &str) -> String {
    format!("最新日报：[{}]({})", date_label, link)
}

/// Replace the text between the markers, or append a fresh block when they are missing.
pub fn replace_latest_block(text: &str, line: &str) -> String {
    let start = text.find(LATEST_START);
    let end = text.find(LATEST_END);
    match (start, end) {
        (Some(start), Some(end)) if start < end => {
            let keep_until = start + LATEST_START.len();
            format!("{}\n{}\n{}", &text[..keep_until], line, &text[end..])
        }
        _ => format!(
            "{}\n最新日报\n{}\n{}\n{}\n",
            text, LATEST_START, line, LATEST_END
        ),
    }
}

fn default_index(line: &str) -> String {
    format!(
        "AI 情报仓库（AI Intelligence Hub）\n\n最新日报\n{}\n{}\n{}\n",
        LATEST_START, line, LATEST_END
    )
}

/// Point the index file at the report for `date_label`, creating the file if needed.
pub fn update_latest(index_path: &Path, reports_dir: &Path, date_label: &str) -> Result<()> {
    let link = report_link(index_path, reports_dir, date_label);
    let line = latest_line(date_label, &link);

    let content = if index_path.exists() {
        let text = std::fs::read_to_string(index_path).map_err(|e| Error::io(index_path, e))?;
        replace_latest_block(&text, &line)
    } else {
        default_index(&line)
    };

    std::fs::write(index_path, content).map_err(|e| Error::write(index_path, e))?;
    info!("Updated latest report pointer in {}", index_path.display());
    Ok(())
}

/// Report path relative to the index file's directory, with forward slashes.
///
/// Falls back to the reports dir as given when one path is absolute and the
/// other is not.
fn report_link(index_path: &Path, reports_dir: &Path, date_label: &str) -> String {
    let report = reports_dir.join(format!("{}.md", date_label));
    let base = index_path.parent().unwrap_or(Path::new(""));

    if base.is_absolute() != report.is_absolute() {
        return report.to_string_lossy().replace('\\', "/");
    }

    let base: Vec<Component> = base.components().filter(|c| *c != Component::CurDir).collect();
    let target: Vec<Component> = report.components().filter(|c| *c != Component::CurDir).collect();
    let common = base.iter().zip(&target).take_while(|(a, b)| a == b).count();

    std::iter::repeat("..".to_string())
        .take(base.len() - common)
        .chain(target[common..].iter().map(|c| c.as_os_str().to_string_lossy().into_owned()))
        .collect::<Vec<_>>()
        .join("/")
}
