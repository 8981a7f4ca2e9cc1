//! Simulation Log Report CLI Application
//!
//! This is the command-line interface for the simulation log decoder.
//! It uses the sim-log-decoder library and adds:
//! - Argument and TOML configuration handling
//! - Mode selection (single run, stub search, summary comparison)
//! - Report generation (text, JSON, SVG charts)

use anyhow::{bail, Context, Result};
use clap::Parser;
use sim_log_decoder::{
    aggregate_files, aggregate_source_groups, extract_summaries, EmptyStubPolicy, KnFilter,
    PathResolver, SourceKind,
};
use std::path::{Path, PathBuf};

mod config;
mod report;

use config::AppConfig;
use report::Report;

/// Simulation Log Report - BLER/BER and timing statistics from simulation logs
#[derive(Parser, Debug)]
#[command(name = "sim-log-report")]
#[command(about = "Parse simulation logs and report error rates and timing", long_about = None)]
#[command(version)]
struct Args {
    /// Log or summary files/directories (default: current directory)
    #[arg(value_name = "PATH")]
    logs: Vec<PathBuf>,

    /// Bits per block, used to normalise BER
    #[arg(long, value_name = "BITS")]
    bits_per_block: Option<u64>,

    /// Histogram bin count
    #[arg(long, value_name = "COUNT")]
    bins: Option<usize>,

    /// Number of information bits
    #[arg(long)]
    k: Option<u64>,

    /// Number of coded bits
    #[arg(long)]
    n: Option<u64>,

    /// Output file (.svg, .json or .txt); default prints a text report
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Plot Es/No vs average decoding time from summary files
    #[arg(long)]
    summary: bool,

    /// Directory searched in stub-pattern mode
    #[arg(long, value_name = "DIR", default_value = ".")]
    dir: PathBuf,

    /// Title for single-run charts
    #[arg(long)]
    title: Option<String>,

    /// Summary file extension (empty for extension-less summaries)
    #[arg(long, value_name = "EXT")]
    summary_ext: Option<String>,

    /// Fail if any stub yields no valid lines instead of dropping it
    #[arg(long)]
    strict: bool,

    /// Path to configuration file (report.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Simulation Log Report v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using decoder library v{}", sim_log_decoder::VERSION);

    let config = build_config(&args)?;
    run(&args, &config)
}

/// Which pipeline an invocation runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Es/No vs average decode time from summary files
    Summary,
    /// `*_<k>_<n>*` search in `--dir`, one histogram pair per stub
    StubSearch { k: u64, n: u64 },
    /// Every resolved log pooled into one run
    Single,
}

impl Mode {
    fn select(args: &Args) -> Self {
        if args.summary {
            Mode::Summary
        } else if let (Some(k), Some(n), true) = (args.k, args.n, args.logs.is_empty()) {
            Mode::StubSearch { k, n }
        } else {
            Mode::Single
        }
    }
}

fn run(args: &Args, config: &AppConfig) -> Result<()> {
    let mode = Mode::select(args);
    log::debug!("Running in {:?} mode", mode);

    match mode {
        Mode::Summary => emit(&summary_report(args, config)?, args.out.as_deref(), config),
        Mode::StubSearch { k, n } => {
            let report = stub_report(args, config, k, n)?;
            let out = stub_output_path(args, k, n);
            report::write_report(&report, &out, config.output.bins)?;

            println!("Wrote {} histograms to {}", report.entries(), out.display());
            Ok(())
        }
        Mode::Single => emit(&single_report(args, config)?, args.out.as_deref(), config),
    }
}

/// Merge the config file (if any) with command-line overrides
fn build_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    if let Some(ext) = &args.summary_ext {
        config.discovery = config.discovery.with_summary_extension(ext.clone());
    }
    if args.bits_per_block.is_some() {
        config.aggregate.bits_per_block = args.bits_per_block;
    }
    if args.strict {
        config.aggregate.empty_stub_policy = EmptyStubPolicy::Abort;
    }
    if let Some(bins) = args.bins {
        config.output.bins = bins;
    }
    if args.title.is_some() {
        config.output.title = args.title.clone();
    }

    if config.output.bins == 0 {
        bail!("--bins must be at least 1");
    }
    config.discovery.validate()?;
    Ok(config)
}

/// Es/No vs average decode time, one point per summary file
fn summary_report(args: &Args, config: &AppConfig) -> Result<Report> {
    let filter = KnFilter::new(args.k, args.n);
    let points = extract_summaries(&args.logs, &filter, &config.discovery)
        .context("Failed to collect summary points")?;
    if points.is_empty() {
        bail!("No matching entries found in summary files");
    }

    Ok(Report::Summary { points })
}

/// Search `*_<k>_<n>*` files and aggregate them per stub
fn stub_report(args: &Args, config: &AppConfig, k: u64, n: u64) -> Result<Report> {
    let groups = PathResolver::new(&config.discovery)
        .find_logs_by_stub(k, n, &args.dir)
        .with_context(|| format!("No log files matching '*_{}_{}*' found", k, n))?;

    let stats = aggregate_source_groups(&groups, &config.aggregate)?;
    Ok(Report::Stubs { stats })
}

fn stub_output_path(args: &Args, k: u64, n: u64) -> PathBuf {
    args.out
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("histograms_{}_{}.svg", k, n)))
}

/// Pool every resolved log into one run
fn single_report(args: &Args, config: &AppConfig) -> Result<Report> {
    let mut resolver = PathResolver::new(&config.discovery);
    if let (Some(k), Some(n)) = (args.k, args.n) {
        resolver = resolver.with_marker(k, n);
    }

    let sources = resolver.resolve(&args.logs, SourceKind::PerLineLog)?;
    let paths: Vec<&Path> = sources.iter().map(|s| s.path()).collect();
    let stats = aggregate_files(&paths, &config.aggregate)?;

    Ok(Report::Single {
        title: config.output.title.clone(),
        stats,
    })
}

/// Write to `out` when given, otherwise print a text report
fn emit(report: &Report, out: Option<&Path>, config: &AppConfig) -> Result<()> {
    match out {
        Some(path) => {
            report::write_report(report, path, config.output.bins)?;
            let entries = report.entries();
            let noun = if entries == 1 { "entry" } else { "entries" };
            println!("Wrote {} {} to {}", entries, noun, path.display());
        }
        None => print!("{}", report::text::render(report, config.output.bins)),
    }
    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_log_decoder::ReportError;
    use std::fs;
    use tempfile::TempDir;

    fn args_in(dir: &TempDir, extra: &[&str]) -> Args {
        let mut argv = vec!["sim-log-report".to_string()];
        argv.extend(extra.iter().map(|a| a.replace("{dir}", &dir.path().to_string_lossy())));
        Args::parse_from(argv)
    }

    #[test]
    fn test_cli_flags_override_config() {
        let args = Args::parse_from([
            "sim-log-report",
            "--bits-per-block",
            "1024",
            "--bins",
            "20",
            "--strict",
            "--summary-ext",
            ".sum",
            "runs/",
        ]);
        let config = build_config(&args).unwrap();

        assert_eq!(config.aggregate.bits_per_block, Some(1024));
        assert_eq!(config.aggregate.empty_stub_policy, EmptyStubPolicy::Abort);
        assert_eq!(config.output.bins, 20);
        assert_eq!(config.discovery.summary_extension, "sum");
        assert_eq!(args.logs, vec![PathBuf::from("runs/")]);
    }

    #[test]
    fn test_zero_bins_rejected() {
        let args = Args::parse_from(["sim-log-report", "--bins", "0"]);
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn test_mode_selection() {
        let dir = TempDir::new().unwrap();

        let args = args_in(&dir, &["--k", "512", "--n", "1024"]);
        assert_eq!(Mode::select(&args), Mode::StubSearch { k: 512, n: 1024 });
        assert_eq!(stub_output_path(&args, 512, 1024), PathBuf::from("histograms_512_1024.svg"));

        let args = args_in(&dir, &["--k", "512", "--n", "1024", "{dir}"]);
        assert_eq!(Mode::select(&args), Mode::Single);

        let args = args_in(&dir, &["--k", "512"]);
        assert_eq!(Mode::select(&args), Mode::Single);

        let args = args_in(&dir, &["--summary", "--k", "512", "--n", "1024"]);
        assert_eq!(Mode::select(&args), Mode::Summary);
    }

    #[test]
    fn test_summary_without_matches_fails() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("minsum.out"), "512 1024 3.5 1000 2 5 110.0 450.0\n").unwrap();

        let args = args_in(&dir, &["--summary", "--k", "256", "--n", "512", "{dir}"]);
        let config = build_config(&args).unwrap();
        let err = summary_report(&args, &config).unwrap_err();
        assert!(err.to_string().contains("No matching entries"));

        let args = args_in(&dir, &["--summary", "{dir}"]);
        let report = summary_report(&args, &config).unwrap();
        assert_eq!(report.entries(), 1);
    }

    #[test]
    fn test_stub_search_writes_histograms() {
        let dir = TempDir::new().unwrap();
        for stub in ["runA", "runB"] {
            fs::write(
                dir.path().join(format!("{}_512_1024.log", stub)),
                "1 0 10.0 20.0\n0 1 12.0 25.0\n",
            )
            .unwrap();
        }
        let out = dir.path().join("histograms_512_1024.svg");
        let out_arg = out.to_string_lossy().into_owned();

        let args = args_in(
            &dir,
            &["--k", "512", "--n", "1024", "--dir", "{dir}", "-o", out_arg.as_str()],
        );
        let config = build_config(&args).unwrap();
        run(&args, &config).unwrap();

        let svg = fs::read_to_string(&out).unwrap();
        assert!(svg.contains("runA"));
        assert!(svg.contains("runB"));
    }

    #[test]
    fn test_stub_search_without_matches_fails() {
        let dir = TempDir::new().unwrap();
        let args = args_in(&dir, &["--k", "512", "--n", "1024", "--dir", "{dir}"]);
        let config = build_config(&args).unwrap();

        let err = stub_report(&args, &config, 512, 1024).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReportError>(),
            Some(ReportError::NoFilesFound(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let args = args_in(&dir, &["{dir}/missing.log"]);
        let config = build_config(&args).unwrap();

        let err = run(&args, &config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReportError>(),
            Some(ReportError::NotFound(_))
        ));
    }

    #[test]
    fn test_args_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
