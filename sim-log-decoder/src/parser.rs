//! Per-line log parsing across files
//!
//! Files are read one at a time, fully, and classified line by line with
//! the line-shape parser. Malformed lines are skipped; a file that yields no
//! record at all is reported with a warning once it has been read, and
//! processing moves on to the next file.

use crate::formats::{parse_log_line, read_text, LogLine};
use crate::types::{FileParseReport, ParsedLogs, ReportError, Result, SourceFile};
use std::path::Path;

/// Parse one file's text content into `logs`, returning its report
pub(crate) fn parse_content(path: &Path, content: &str, logs: &mut ParsedLogs) -> FileParseReport {
    let mut report = FileParseReport {
        path: path.to_path_buf(),
        parsed: 0,
        skipped: 0,
    };

    for (index, line) in content.lines().enumerate() {
        match parse_log_line(line) {
            LogLine::Ignored => {}
            LogLine::Record(record) => {
                logs.push(record);
                report.parsed += 1;
            }
            LogLine::Malformed => {
                log::trace!("{:?}:{}: skipping malformed line {:?}", path, index + 1, line);
                report.skipped += 1;
            }
        }
    }

    if report.is_empty() {
        log::warn!(
            "No valid lines in {:?} ({} line(s) skipped)",
            path,
            report.skipped
        );
    } else {
        log::debug!(
            "Parsed {} record(s) from {:?} ({} skipped)",
            report.parsed,
            path,
            report.skipped
        );
    }
    report
}

/// Parse every file in order and accumulate their records
///
/// Fails with `NoValidLines` when the files exist but none of them holds a
/// single parseable line. Read errors on a file are fatal.
pub fn parse_logs<P: AsRef<Path>>(paths: &[P]) -> Result<ParsedLogs> {
    let mut logs = ParsedLogs::default();

    for path in paths {
        let path = path.as_ref();
        log::info!("Parsing log file: {:?}", path);
        let content = read_text(path)?;
        let report = parse_content(path, &content, &mut logs);
        logs.files.push(report);
    }

    if logs.is_empty() {
        return Err(ReportError::NoValidLines { files: paths.len() });
    }
    Ok(logs)
}

/// [`parse_logs`] over resolved source files
pub fn parse_sources(sources: &[SourceFile]) -> Result<ParsedLogs> {
    let paths: Vec<&Path> = sources.iter().map(|s| s.path()).collect();
    parse_logs(&paths)
}
