//! Simulation Log Decoder Library
//!
//! A stateless, reusable library for reading encode/decode simulation logs
//! and reducing them to block and bit error rates.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on the numbers:
//! - Resolves file/directory inputs into a deterministic list of sources
//! - Parses per-line logs in both historical layouts (4-field and 8-field)
//! - Computes BLER and BER per run group ("stub")
//! - Extracts (Es/No, average decode time) points from summary files
//!
//! The library does NOT:
//! - Draw histograms or scatter plots
//! - Parse command-line arguments
//! - Print reports
//!
//! All presentation is in the application layer (sim-log-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use sim_log_decoder::{aggregate_source_groups, find_logs_by_stub, AggregateOptions, DiscoveryConfig};
//! use std::path::Path;
//!
//! let config = DiscoveryConfig::new();
//! let stubs = find_logs_by_stub(512, 1024, Path::new("runs"), &config).unwrap();
//!
//! let options = AggregateOptions::new().with_bits_per_block(Some(512));
//! let stats = aggregate_source_groups(&stubs, &options).unwrap();
//!
//! for (stub, run) in &stats {
//!     println!("{}: BLER={:.4} BER={:.4e}", stub, run.bler, run.ber);
//! }
//! ```

// Public modules
pub mod aggregator;
pub mod config;
pub mod parser;
pub mod rates;
pub mod resolver;
pub mod summary;
pub mod types;

// Internal modules (not exposed in public API)
mod formats;

// Re-export main types for convenience
pub use aggregator::{aggregate_files, aggregate_source_groups, aggregate_stubs, merge_last_write_wins};
pub use config::{AggregateOptions, DiscoveryConfig, EmptyStubPolicy, KnFilter};
pub use parser::{parse_logs, parse_sources};
pub use rates::calc_rates;
pub use resolver::{derive_stub, find_logs_by_stub, group_by_stub, resolve_sources, PathResolver};
pub use summary::{extract_from_sources, extract_summaries};
pub use types::{
    ErrorRates, FileParseReport, ParsedLogs, ParsedRecord, ReportError, Result,
    RunStatistics, SourceFile, SourceKind, SummaryPoint,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
