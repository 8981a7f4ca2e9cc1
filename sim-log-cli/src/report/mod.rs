//! Report generation
//!
//! Renders aggregated statistics as a terminal/text report, a JSON dump, or
//! SVG charts. The output path's extension selects the encoding.

pub mod histogram;
pub mod plot;
pub mod text;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use sim_log_decoder::{RunStatistics, SummaryPoint};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// What one invocation produced, ready for rendering
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Report {
    /// All input files pooled into one run
    Single {
        title: Option<String>,
        stats: RunStatistics,
    },
    /// One run per stub, in stub-sorted order
    Stubs {
        stats: BTreeMap<String, RunStatistics>,
    },
    /// One (Es/No, average decode time) point per stub
    Summary {
        points: BTreeMap<String, SummaryPoint>,
    },
}

impl Report {
    /// Number of stubs or runs the report covers
    pub fn entries(&self) -> usize {
        match self {
            Report::Single { .. } => 1,
            Report::Stubs { stats } => stats.len(),
            Report::Summary { points } => points.len(),
        }
    }
}

/// Output encoding, chosen from the output path's extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Json,
    Txt,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        match extension.as_deref() {
            Some("svg") => Ok(OutputFormat::Svg),
            Some("json") => Ok(OutputFormat::Json),
            Some("txt") => Ok(OutputFormat::Txt),
            other => bail!(
                "Unsupported output format {:?} for {:?} (use .svg, .json or .txt)",
                other.unwrap_or(""),
                path
            ),
        }
    }
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    generated_at: String,
    generator: String,
    #[serde(flatten)]
    report: &'a Report,
}

/// Write `report` to `path` in the encoding its extension selects
pub fn write_report(report: &Report, path: &Path, bins: usize) -> Result<()> {
    let format = OutputFormat::from_path(path)?;
    log::info!("Writing {:?} report to {:?}", format, path);

    match format {
        OutputFormat::Svg => plot::render(report, path, bins)?,
        OutputFormat::Json => {
            let document = JsonDocument {
                generated_at: chrono::Local::now().to_rfc3339(),
                generator: format!("sim-log-report v{}", env!("CARGO_PKG_VERSION")),
                report,
            };
            let json = serde_json::to_string_pretty(&document)
                .context("Failed to serialise report")?;
            fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
        }
        OutputFormat::Txt => {
            let text = text::render(report, bins);
            fs::write(path, text).with_context(|| format!("Failed to write {:?}", path))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_log_decoder::{ParsedLogs, ParsedRecord};
    use tempfile::TempDir;

    pub(crate) fn sample_stats() -> RunStatistics {
        let mut logs = ParsedLogs::default();
        for (block_error, bit_error, encode_time, decode_time) in
            [(1, 0, 120.5, 340.2), (0, 2, 98.0, 310.0)]
        {
            logs.push(ParsedRecord {
                block_error,
                bit_error,
                encode_time,
                decode_time,
            });
        }
        RunStatistics::from_logs(logs, Some(1024)).unwrap()
    }

    #[test]
    fn test_output_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("a.svg")).unwrap(), OutputFormat::Svg);
        assert_eq!(OutputFormat::from_path(Path::new("a.JSON")).unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path(Path::new("dir/a.txt")).unwrap(), OutputFormat::Txt);
        assert!(OutputFormat::from_path(Path::new("a.pdf")).is_err());
        assert!(OutputFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_write_json_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        let report = Report::Single {
            title: Some("ldpc".to_string()),
            stats: sample_stats(),
        };

        write_report(&report, &path, 10).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["mode"], "single");
        assert_eq!(value["title"], "ldpc");
        assert_eq!(value["stats"]["bler"], 0.5);
        assert_eq!(value["stats"]["ber"], 0.0009765625);
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn test_write_text_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.txt");
        let mut points = BTreeMap::new();
        points.insert(
            "minsum".to_string(),
            SummaryPoint {
                esno: 3.5,
                avg_decode_time: 450.0,
            },
        );

        write_report(&Report::Summary { points }, &path, 10).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("minsum"));
        assert!(text.contains("3.50"));
    }

    #[test]
    fn test_unsupported_extension_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.pdf");
        let report = Report::Stubs {
            stats: BTreeMap::new(),
        };
        assert!(write_report(&report, &path, 10).is_err());
        assert!(!path.exists());
    }
}
