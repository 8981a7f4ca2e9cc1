//! Plain-text report: tables plus ASCII decode-time histograms

use super::histogram::Histogram;
use super::Report;
use sim_log_decoder::RunStatistics;
use std::fmt::Write;

const BAR_WIDTH: usize = 40;

/// Mean and nearest-rank percentiles of a set of times
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSummary {
    pub mean: f64,
    pub p50: f64,
    pub p95: f64,
}

impl TimeSummary {
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;

        Some(Self {
            mean,
            p50: percentile(&sorted, 50.0),
            p95: percentile(&sorted, 95.0),
        })
    }
}

fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let rank = ((pct / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

/// Render `report` as text
pub fn render(report: &Report, bins: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Simulation log report ({})", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "{}", "═".repeat(72));

    match report {
        Report::Single { title, stats } => {
            if let Some(title) = title {
                let _ = writeln!(out, "{}\n", title);
            }
            write_stats_table(&mut out, std::iter::once(("all", stats)));
            write_histogram(&mut out, "Decoding time (µs)", &stats.decode_times, bins);
            write_histogram(&mut out, "Encoding time (µs)", &stats.encode_times, bins);
        }
        Report::Stubs { stats } => {
            write_stats_table(&mut out, stats.iter().map(|(stub, s)| (stub.as_str(), s)));
            for (stub, run) in stats {
                write_histogram(&mut out, &format!("{}: decoding time (µs)", stub), &run.decode_times, bins);
            }
        }
        Report::Summary { points } => {
            let _ = writeln!(out, "{:<24} {:>10} {:>16}", "stub", "Es/No (dB)", "avg dec (µs)");
            let _ = writeln!(out, "{}", "─".repeat(52));
            for (stub, point) in points {
                let _ = writeln!(
                    out,
                    "{:<24} {:>10.2} {:>16.2}",
                    stub, point.esno, point.avg_decode_time
                );
            }
        }
    }
    out
}

fn write_stats_table<'a>(out: &mut String, rows: impl Iterator<Item = (&'a str, &'a RunStatistics)>) {
    let _ = writeln!(
        out,
        "{:<20} {:>8} {:>9} {:>11} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "stub", "blocks", "BLER", "BER", "enc mean", "enc p95", "dec mean", "dec p50", "dec p95"
    );
    let _ = writeln!(out, "{}", "─".repeat(106));

    let mut fallback = false;
    for (stub, stats) in rows {
        let enc = TimeSummary::from_samples(&stats.encode_times);
        let dec = TimeSummary::from_samples(&stats.decode_times);
        let marker = if stats.ber_normalized { " " } else { "*" };
        fallback |= !stats.ber_normalized;

        let _ = writeln!(
            out,
            "{:<20} {:>8} {:>9.4} {:>10.4e}{} {:>10.1} {:>10.1} {:>10.1} {:>10.1} {:>10.1}",
            stub,
            stats.blocks(),
            stats.bler,
            stats.ber,
            marker,
            enc.map_or(f64::NAN, |s| s.mean),
            enc.map_or(f64::NAN, |s| s.p95),
            dec.map_or(f64::NAN, |s| s.mean),
            dec.map_or(f64::NAN, |s| s.p50),
            dec.map_or(f64::NAN, |s| s.p95),
        );
    }
    if fallback {
        let _ = writeln!(out, "* BER is the mean bit-error count per block (no --bits-per-block)");
    }
}

fn write_histogram(out: &mut String, label: &str, samples: &[f64], bins: usize) {
    let Some(hist) = Histogram::from_samples(samples, bins) else {
        return;
    };
    let scale = hist.max_count().max(1);

    let _ = writeln!(out, "\n{}", label);
    for (start, end, count) in hist.bins() {
        let bar = "█".repeat(count * BAR_WIDTH / scale);
        let _ = writeln!(out, "{:>10.1} – {:<10.1} │{:<width$} {}", start, end, bar, count, width = BAR_WIDTH);
    }
}
