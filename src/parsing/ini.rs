//! Reader and writer for INI-style configuration files.
//!
//! Accepted syntax:
//!
//! ```text
//! # comment
//! ; comment
//! [DEFAULT]
//! refversion = hg19
//!
//! [hg19]
//! reference = hg19.fa
//! refseq: /data/hg19.refseq.gff.gz.transvardb
//! multi = first line
//!     continued line
//! ```
//!
//! Option names are lowercased. Values keep their inner whitespace; an
//! indented line continues the previous value.

use std::fmt::Write as _;
use std::path::Path;

use thiserror::Error;

use crate::config::document::ConfigDocument;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: option outside of any section")]
    MissingSectionHeader { line: usize },

    #[error("line {line}: empty section name")]
    EmptySectionName { line: usize },

    #[error("line {line}: expected 'key = value', found '{content}'")]
    InvalidLine { line: usize, content: String },
}

/// Parse an INI file into a document
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or a syntax error.
pub fn parse_ini_file(path: &Path) -> Result<ConfigDocument, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_ini_text(&content)
}

/// Parse INI text into a document
///
/// # Errors
///
/// Returns a syntax error carrying the 1-based line number.
pub fn parse_ini_text(text: &str) -> Result<ConfigDocument, ParseError> {
    let mut doc = ConfigDocument::new();
    let mut section: Option<String> = None;
    let mut current: Option<(String, String)> = None;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            flush(&mut doc, section.as_deref(), &mut current);
            continue;
        }
        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        // Indented line continues the previous value
        if raw.starts_with(char::is_whitespace) {
            if let Some((_, value)) = current.as_mut() {
                value.push('\n');
                value.push_str(trimmed);
                continue;
            }
        }

        flush(&mut doc, section.as_deref(), &mut current);

        if let Some(inner) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            let name = inner.trim();
            if name.is_empty() {
                return Err(ParseError::EmptySectionName { line: line_no });
            }
            section = Some(name.to_string());
            continue;
        }

        if section.is_none() {
            return Err(ParseError::MissingSectionHeader { line: line_no });
        }

        let Some(split) = trimmed.find(['=', ':']) else {
            return Err(ParseError::InvalidLine {
                line: line_no,
                content: trimmed.to_string(),
            });
        };
        let key = trimmed[..split].trim();
        if key.is_empty() {
            return Err(ParseError::InvalidLine {
                line: line_no,
                content: trimmed.to_string(),
            });
        }
        let value = trimmed[split + 1..].trim();
        current = Some((key.to_string(), value.to_string()));
    }

    flush(&mut doc, section.as_deref(), &mut current);
    doc.mark_clean();
    Ok(doc)
}

fn flush(doc: &mut ConfigDocument, section: Option<&str>, current: &mut Option<(String, String)>) {
    if let (Some(section), Some((key, value))) = (section, current.take()) {
        doc.set(section, &key, &value);
    }
}

/// Render a document as INI text. `DEFAULT` comes first and is omitted when empty.
#[must_use]
pub fn write_ini_text(doc: &ConfigDocument) -> String {
    let mut out = String::new();

    for section in doc.all_sections() {
        if section.options.is_empty() && section.name == crate::core::types::DEFAULT_SECTION {
            continue;
        }
        let _ = writeln!(out, "[{}]", section.name);
        for (key, value) in &section.options {
            let value = value.replace('\n', "\n\t");
            let _ = writeln!(out, "{key} = {value}");
        }
        out.push('\n');
    }

    out
}
