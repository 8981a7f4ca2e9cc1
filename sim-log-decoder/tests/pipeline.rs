// End-to-end runs of the public API over temporary directories
use sim_log_decoder::{
    aggregate_files, aggregate_source_groups, extract_summaries, find_logs_by_stub,
    resolve_sources, AggregateOptions, DiscoveryConfig, KnFilter, ReportError, SourceKind,
};
use std::fs;
use tempfile::TempDir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn single_run_from_directory() {
    init_logging();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("run.log"), "1 0 120.5 340.2\n0 2 98.0 310.0\n").unwrap();
    // Companion summary makes run.log eligible; its 8-field line is parsed too
    fs::write(dir.path().join("run.out"), "512 1024 3.5 1000 2 5 110.0 450.0\n").unwrap();
    fs::write(dir.path().join("stray.log"), "1 1 1.0 1.0\n").unwrap();
    fs::write(dir.path().join("notes.txt"), "1 1 1.0 1.0\n").unwrap();

    let config = DiscoveryConfig::new();
    let sources =
        resolve_sources(&[dir.path().to_path_buf()], SourceKind::PerLineLog, &config).unwrap();
    assert_eq!(sources.len(), 2);

    let paths: Vec<_> = sources.iter().map(|s| s.path.clone()).collect();
    let options = AggregateOptions::new().with_bits_per_block(Some(1024));
    let stats = aggregate_files(&paths, &options).unwrap();

    assert_eq!(stats.block_errors, vec![1, 0, 2]);
    assert_eq!(stats.bit_errors, vec![0, 2, 5]);
    assert_eq!(stats.decode_times, vec![340.2, 310.0, 450.0]);
    assert_eq!(stats.bler, 1.0);
    assert_eq!(stats.ber, 7.0 / (1024.0 * 3.0));
}

#[test]
fn stub_search_then_aggregate() {
    init_logging();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("runA_512_1024.log"), "1 0 120.5 340.2\n0 2 98.0 310.0\n").unwrap();
    fs::write(
        dir.path().join("runB_512_1024.out"),
        "512 1024 3.5 1000 2 5 110.0 450.0\n",
    )
    .unwrap();

    let config = DiscoveryConfig::new();
    let groups = find_logs_by_stub(512, 1024, dir.path(), &config).unwrap();
    assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["runA", "runB"]);

    let stats = aggregate_source_groups(&groups, &AggregateOptions::new()).unwrap();
    assert_eq!(stats["runA"].bler, 0.5);
    assert_eq!(stats["runA"].ber, 1.0);
    assert!(!stats["runA"].ber_normalized);
    assert_eq!(stats["runB"].block_errors, vec![2]);
}

#[test]
fn summary_and_per_line_views_of_the_same_line() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cmp.out");
    fs::write(&path, "512 1024 3.5 1000 2 5 110.0 450.0\n").unwrap();

    let config = DiscoveryConfig::new();
    let points = extract_summaries(
        &[path.clone()],
        &KnFilter::new(Some(512), Some(1024)),
        &config,
    )
    .unwrap();
    assert_eq!(points["cmp"].esno, 3.5);
    assert_eq!(points["cmp"].avg_decode_time, 450.0);

    let stats = aggregate_files(&[path], &AggregateOptions::new()).unwrap();
    assert_eq!(stats.block_errors, vec![2]);
    assert_eq!(stats.bit_errors, vec![5]);
    assert_eq!(stats.encode_times, vec![110.0]);
}

#[test]
fn every_discovery_mode_reports_empty_input() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let config = DiscoveryConfig::new();
    let inputs = [dir.path().to_path_buf()];

    let logs = resolve_sources(&inputs, SourceKind::PerLineLog, &config).unwrap_err();
    assert!(logs.is_empty_input());

    let stubs = find_logs_by_stub(1, 2, dir.path(), &config).unwrap_err();
    assert!(stubs.is_empty_input());

    let summary = extract_summaries(&inputs, &KnFilter::any(), &config).unwrap_err();
    assert!(summary.is_empty_input());
}

#[test]
fn no_valid_lines_is_distinct_from_no_files() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("junk.log");
    fs::write(&path, "header without data\n").unwrap();

    let err = aggregate_files(&[path], &AggregateOptions::new()).unwrap_err();
    assert!(matches!(err, ReportError::NoValidLines { files: 1 }));
    assert!(err.to_string().contains("No valid log lines"));
}
