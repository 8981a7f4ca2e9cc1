//! Text log formats (per-line logs and summary files)
//!
//! Both formats are whitespace-delimited text. This module holds the shared
//! tokenising and permissive decoding; each submodule recognises its own line
//! shapes.

use crate::types::{ReportError, Result};
use std::borrow::Cow;
use std::path::Path;

pub(crate) mod lines;
pub(crate) mod summary;

pub(crate) use lines::{parse_log_line, LogLine};
pub(crate) use summary::first_match;

/// A line after comment and blank handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RawLine<'a> {
    Ignored,
    Tokens(Vec<&'a str>),
}

pub(crate) fn classify(line: &str) -> RawLine<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return RawLine::Ignored;
    }
    RawLine::Tokens(trimmed.split_whitespace().collect())
}

/// Decode bytes as UTF-8, dropping invalid byte sequences
///
/// Valid text, including any literal U+FFFD, is kept unchanged.
pub fn decode_permissive(bytes: &[u8]) -> Cow<'_, str> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Cow::Borrowed(text);
    }

    log::debug!("Dropping undecodable bytes from log content");
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    Cow::Owned(text)
}

/// Read a whole file as text, dropping undecodable bytes
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ReportError::NotFound(path.to_path_buf()),
        _ => ReportError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    Ok(decode_permissive(&bytes).into_owned())
}
