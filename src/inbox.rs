//! Manually written notes merged into a day's report.
//!
//! Notes are files named `YYYY-MM-DD_<anything>.txt` (or `.md`) in the inbox
//! directory. The first line is the title, the rest is the body.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::report::report_title;

const NOTE_EXTENSIONS: &[&str] = &["txt", "md"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxNote {
    pub title: String,
    pub body: String,
}

/// Note files for `date_label`, sorted by file name. A missing directory has no notes.
pub fn find_notes(inbox_dir: &Path, date_label: &str) -> Result<Vec<PathBuf>> {
    if !inbox_dir.is_dir() {
        debug!("Inbox directory {} does not exist", inbox_dir.display());
        return Ok(Vec::new());
    }

    let prefix = format!("{}_", date_label);
    let mut notes = Vec::new();
    for dir_entry in std::fs::read_dir(inbox_dir).map_err(|e| Error::io(inbox_dir, e))? {
        let path = dir_entry.map_err(|e| Error::io(inbox_dir, e))?.path();
        let matches_date = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(&prefix));
        let is_note = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| NOTE_EXTENSIONS.iter().any(|n| ext.eq_ignore_ascii_case(n)));
        if path.is_file() && matches_date && is_note {
            notes.push(path);
        }
    }
    notes.sort();
    Ok(notes)
}

pub fn read_note(path: &Path) -> Result<InboxNote> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(parse_note(&String::from_utf8_lossy(&bytes), &stem))
}

/// Split note text into title and body; `fallback_title` covers blank titles.
pub fn parse_note(text: &str, fallback_title: &str) -> InboxNote {
    let text = text.trim();
    let mut lines = text.lines();
    let title = match lines.next().map(str::trim) {
        Some(first) if !first.is_empty() => first.to_string(),
        _ => fallback_title.to_string(),
    };
    let body = lines.collect::<Vec<_>>().join("\n").trim().to_string();
    InboxNote { title, body }
}

/// Markdown for the inbox section, ending in a single newline.
pub fn render_inbox_section(notes: &[InboxNote]) -> String {
    let mut lines: Vec<String> = vec!["## 收件箱补充".to_string(), String::new()];
    for note in notes {
        lines.push(format!("- {}", note.title));
        if !note.body.is_empty() {
            lines.push(String::new());
            // Only the first line is indented; the rest of the body is kept verbatim
            lines.push(format!("  {}", note.body));
            lines.push(String::new());
        }
    }
    let mut out = lines.join("\n").trim_end().to_string();
    out.push('\n');
    out
}

/// Create a stub report for `date_label` unless one already exists.
pub fn ensure_minimal_report(report_path: &Path, date_label: &str) -> Result<()> {
    if report_path.exists() {
        return Ok(());
    }
    if let Some(parent) = report_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::write(parent, e))?;
    }
    let content = format!("{}\n\n(自动创建的最小日报，等待补充)\n\n", report_title(date_label));
    std::fs::write(report_path, content).map_err(|e| Error::write(report_path, e))
}

/// Append all of `date_label`'s notes to its report. Returns how many were ingested.
pub fn ingest(inbox_dir: &Path, report_path: &Path, date_label: &str) -> Result<usize> {
    let files = find_notes(inbox_dir, date_label)?;
    if files.is_empty() {
        info!("No inbox notes found for {} in {}", date_label, inbox_dir.display());
        return Ok(0);
    }

    ensure_minimal_report(report_path, date_label)?;

    let notes = files
        .iter()
        .map(|path| read_note(path))
        .collect::<Result<Vec<_>>>()?;

    let mut file = OpenOptions::new()
        .append(true)
        .open(report_path)
        .map_err(|e| Error::write(report_path, e))?;
    write!(file, "\n{}", render_inbox_section(&notes)).map_err(|e| Error::write(report_path, e))?;

    info!("Ingested {} notes into {}", notes.len(), report_path.display());
    Ok(notes.len())
}
