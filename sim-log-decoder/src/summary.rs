//! Summary file extraction
//!
//! One (Es/No, average decode time) point per summary file, keyed by the
//! file's stem. Within a file the first line accepted by the (k, n) filter
//! wins; later lines are never read for that file.

use crate::aggregator::merge_last_write_wins;
use crate::config::{DiscoveryConfig, KnFilter};
use crate::formats::{first_match, read_text};
use crate::resolver::PathResolver;
use crate::types::{Result, SourceFile, SourceKind, SummaryPoint};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Resolve summary inputs and extract one point per matching file
///
/// Directory inputs are expanded to their summary-extension members; an
/// empty input list searches the current directory. A missing explicit file
/// or an empty resolution is an error, but files without a matching line
/// simply contribute nothing, so the returned map may be empty.
pub fn extract_summaries(
    inputs: &[PathBuf],
    filter: &KnFilter,
    config: &DiscoveryConfig,
) -> Result<BTreeMap<String, SummaryPoint>> {
    let sources = PathResolver::new(config).resolve(inputs, SourceKind::Summary)?;
    extract_from_sources(&sources, filter)
}

/// Extract summary points from already resolved files
pub fn extract_from_sources(
    sources: &[SourceFile],
    filter: &KnFilter,
) -> Result<BTreeMap<String, SummaryPoint>> {
    let mut points = BTreeMap::new();

    for source in sources {
        let content = read_text(source.path())?;
        match first_match(&content, filter) {
            Some(line) => {
                log::debug!(
                    "{:?}: k={} n={} esno={} avg_dec={}",
                    source.path,
                    line.k,
                    line.n,
                    line.esno,
                    line.avg_decode_time
                );
                merge_last_write_wins(&mut points, source.stub.clone(), line.point());
            }
            None => {
                log::debug!("{:?}: no summary line matches {:?}", source.path, filter);
            }
        }
    }

    log::info!(
        "Extracted {} summary point(s) from {} file(s)",
        points.len(),
        sources.len()
    );
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReportError;
    use std::fs;
    use tempfile::TempDir;

    const SUMMARY: &str = "\
# k n esno nblk blkerr biterr avg_enc avg_dec
256 512 1.5 1000 20 80 40.0 150.0
512 1024 3.5 1000 2 5 110.0 450.0
512 1024 4.0 1000 0 0 111.0 400.0
";

    #[test]
    fn test_extract_with_filter() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("minsum.out"), SUMMARY).unwrap();
        fs::write(dir.path().join("bp.out"), "512 1024 2.0 1000 9 30 100.0 900.0\n").unwrap();
        fs::write(dir.path().join("ignored.log"), SUMMARY).unwrap();

        let config = DiscoveryConfig::new();
        let filter = KnFilter::new(Some(512), Some(1024));
        let points = extract_summaries(&[dir.path().to_path_buf()], &filter, &config).unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(
            points["minsum"],
            SummaryPoint {
                esno: 3.5,
                avg_decode_time: 450.0
            }
        );
        assert_eq!(points["bp"].esno, 2.0);
    }

    #[test]
    fn test_extract_without_filter_takes_first_valid_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("minsum.out");
        fs::write(&path, SUMMARY).unwrap();

        let config = DiscoveryConfig::new();
        let points = extract_summaries(&[path], &KnFilter::any(), &config).unwrap();
        assert_eq!(points["minsum"].esno, 1.5);
    }

    #[test]
    fn test_no_matching_line_contributes_nothing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("minsum.out"), SUMMARY).unwrap();

        let config = DiscoveryConfig::new();
        let filter = KnFilter::new(Some(64), Some(128));
        let points = extract_summaries(&[dir.path().to_path_buf()], &filter, &config).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_duplicate_stub_last_write_wins() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("one");
        let second = dir.path().join("two");
        fs::create_dir(&first).unwrap();
        fs::create_dir(&second).unwrap();
        fs::write(first.join("dec.out"), "1 2 1.0 10 0 0 1.0 100.0\n").unwrap();
        fs::write(second.join("dec.out"), "1 2 2.0 10 0 0 1.0 200.0\n").unwrap();

        let config = DiscoveryConfig::new();
        let points = extract_summaries(&[first, second], &KnFilter::any(), &config).unwrap();

        assert_eq!(points.len(), 1);
        assert_eq!(points["dec"].avg_decode_time, 200.0);
    }

    #[test]
    fn test_extensionless_summary_convention() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("layered"), SUMMARY).unwrap();
        fs::write(dir.path().join("layered.log"), "1 0 1.0 2.0\n").unwrap();

        let config = DiscoveryConfig::new().with_summary_extension("");
        let points =
            extract_summaries(&[dir.path().to_path_buf()], &KnFilter::any(), &config).unwrap();

        assert_eq!(points.keys().collect::<Vec<_>>(), vec!["layered"]);
    }

    #[test]
    fn test_empty_directory_is_no_files_found() {
        let dir = TempDir::new().unwrap();
        let config = DiscoveryConfig::new();
        let result = extract_summaries(&[dir.path().to_path_buf()], &KnFilter::any(), &config);
        assert!(matches!(result, Err(ReportError::NoFilesFound(_))));
    }
}
