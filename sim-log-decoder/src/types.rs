//! Core types for the simulation log decoder library
//!
//! This module defines the data model shared by every stage of the pipeline:
//! resolved source files, decoded log lines, per-stub aggregates and summary
//! points. Everything here is plain data; the logic lives in the resolver,
//! parser, rate and aggregator modules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while resolving, parsing or aggregating logs
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Log file not found: {0:?}")]
    NotFound(PathBuf),

    #[error("No files found: {0}")]
    NoFilesFound(String),

    #[error("No valid log lines found in {files} file(s)")]
    NoValidLines { files: usize },

    #[error("Cannot compute rates over an empty sequence")]
    EmptySequence,

    #[error("Sequence length mismatch: {block_errors} block errors vs {bit_errors} bit errors")]
    LengthMismatch {
        block_errors: usize,
        bit_errors: usize,
    },

    #[error("Stub '{stub}' failed: {source}")]
    StubFailed {
        stub: String,
        #[source]
        source: Box<ReportError>,
    },

    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ReportError {
    /// True for the two "nothing to report" failures (no files, no valid lines)
    pub fn is_empty_input(&self) -> bool {
        match self {
            ReportError::NoFilesFound(_) | ReportError::NoValidLines { .. } => true,
            ReportError::StubFailed { source, .. } => source.is_empty_input(),
            _ => false,
        }
    }
}

/// Logical kind of a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Raw per-line log: one record per simulated block
    PerLineLog,
    /// Summary file: one aggregate line per (k, n, esno) point
    Summary,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::PerLineLog => write!(f, "log"),
            SourceKind::Summary => write!(f, "summary"),
        }
    }
}

/// A resolved input file with its derived kind and stub name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub kind: SourceKind,
    /// Cohort name the file belongs to
    pub stub: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, kind: SourceKind, stub: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            stub: stub.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// One decoded per-line log record
///
/// Times are in microseconds. `block_error` is either a 0/1 flag or a count,
/// whichever convention the simulator wrote; it is never normalised.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParsedRecord {
    pub block_error: u64,
    pub bit_error: u64,
    pub encode_time: f64,
    pub decode_time: f64,
}

/// Per-file outcome of the line parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileParseReport {
    pub path: PathBuf,
    /// Lines that produced a record
    pub parsed: usize,
    /// Non-blank, non-comment lines that matched no shape
    pub skipped: usize,
}

impl FileParseReport {
    pub fn is_empty(&self) -> bool {
        self.parsed == 0
    }
}

/// Column-oriented accumulation of every record parsed in one invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedLogs {
    pub block_errors: Vec<u64>,
    pub bit_errors: Vec<u64>,
    pub encode_times: Vec<f64>,
    pub decode_times: Vec<f64>,
    pub files: Vec<FileParseReport>,
}

impl ParsedLogs {
    pub fn push(&mut self, record: ParsedRecord) {
        self.block_errors.push(record.block_error);
        self.bit_errors.push(record.bit_error);
        self.encode_times.push(record.encode_time);
        self.decode_times.push(record.decode_time);
    }

    /// Number of records (all four columns have this length)
    pub fn len(&self) -> usize {
        self.block_errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.block_errors.is_empty()
    }
}

/// Block and bit error rates derived from one set of records
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorRates {
    pub bler: f64,
    pub ber: f64,
    /// False when BER fell back to the raw mean of bit errors
    pub ber_normalized: bool,
}

/// Aggregate statistics for one stub
///
/// Only constructed from a non-empty record set; see
/// [`RunStatistics::from_logs`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStatistics {
    pub block_errors: Vec<u64>,
    pub bit_errors: Vec<u64>,
    pub encode_times: Vec<f64>,
    pub decode_times: Vec<f64>,
    pub bler: f64,
    pub ber: f64,
    pub ber_normalized: bool,
}

impl RunStatistics {
    /// Build statistics from parsed logs, computing BLER and BER
    pub fn from_logs(logs: ParsedLogs, bits_per_block: Option<u64>) -> Result<Self> {
        let rates = crate::rates::calc_rates(&logs.block_errors, &logs.bit_errors, bits_per_block)?;
        Ok(Self {
            block_errors: logs.block_errors,
            bit_errors: logs.bit_errors,
            encode_times: logs.encode_times,
            decode_times: logs.decode_times,
            bler: rates.bler,
            ber: rates.ber,
            ber_normalized: rates.ber_normalized,
        })
    }

    /// Number of blocks contributing to these statistics
    pub fn blocks(&self) -> usize {
        self.block_errors.len()
    }

    pub fn rates(&self) -> ErrorRates {
        ErrorRates {
            bler: self.bler,
            ber: self.ber,
            ber_normalized: self.ber_normalized,
        }
    }
}

/// One (Es/No, average decode time) point taken from a summary file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryPoint {
    pub esno: f64,
    pub avg_decode_time: f64,
}
