//! Per-stub aggregation
//!
//! Each stub is parsed and reduced independently. What happens to a stub
//! whose files hold no valid line is decided by [`EmptyStubPolicy`]:
//! `Skip` drops it with a warning (the run still fails if every stub is
//! dropped), `Abort` fails the whole run with `StubFailed`.

use crate::config::{AggregateOptions, EmptyStubPolicy};
use crate::parser::parse_logs;
use crate::types::{ReportError, Result, RunStatistics, SourceFile};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Parse and reduce one set of files into a single statistics bundle
pub fn aggregate_files<P: AsRef<Path>>(
    paths: &[P],
    options: &AggregateOptions,
) -> Result<RunStatistics> {
    let logs = parse_logs(paths)?;
    RunStatistics::from_logs(logs, options.bits_per_block)
}

/// Aggregate every stub of `stubs`, keyed and ordered by stub name
pub fn aggregate_stubs<P: AsRef<Path>>(
    stubs: &BTreeMap<String, Vec<P>>,
    options: &AggregateOptions,
) -> Result<BTreeMap<String, RunStatistics>> {
    let mut results = BTreeMap::new();
    let mut dropped = 0usize;

    for (stub, paths) in stubs {
        log::info!("Aggregating stub '{}' ({} file(s))", stub, paths.len());

        match aggregate_files(paths, options) {
            Ok(stats) => {
                log::debug!(
                    "Stub '{}': {} blocks, BLER={:.4}, BER={:.4e}",
                    stub,
                    stats.blocks(),
                    stats.bler,
                    stats.ber
                );
                merge_last_write_wins(&mut results, stub.clone(), stats);
            }
            Err(e) if e.is_empty_input() && options.empty_stub_policy == EmptyStubPolicy::Skip => {
                log::warn!("Dropping stub '{}': {}", stub, e);
                dropped += 1;
            }
            Err(e) => {
                return Err(ReportError::StubFailed {
                    stub: stub.clone(),
                    source: Box::new(e),
                });
            }
        }
    }

    if results.is_empty() {
        return Err(ReportError::NoValidLines {
            files: stubs.values().map(|p| p.len()).sum(),
        });
    }
    if dropped > 0 {
        log::warn!("{} of {} stub(s) dropped for lack of data", dropped, stubs.len());
    }
    Ok(results)
}

/// [`aggregate_stubs`] over grouped source files
pub fn aggregate_source_groups(
    groups: &BTreeMap<String, Vec<SourceFile>>,
    options: &AggregateOptions,
) -> Result<BTreeMap<String, RunStatistics>> {
    let paths: BTreeMap<String, Vec<PathBuf>> = groups
        .iter()
        .map(|(stub, sources)| {
            (
                stub.clone(),
                sources.iter().map(|s| s.path.clone()).collect(),
            )
        })
        .collect();
    aggregate_stubs(&paths, options)
}

/// Insert `value` under `stub`, replacing any earlier entry
///
/// Later writes win. Returns the replaced value, if any.
pub fn merge_last_write_wins<V>(
    map: &mut BTreeMap<String, V>,
    stub: String,
    value: V,
) -> Option<V> {
    let previous = map.insert(stub.clone(), value);
    if previous.is_some() {
        log::warn!("Stub '{}' seen more than once; keeping the later entry", stub);
    }
    previous
}
