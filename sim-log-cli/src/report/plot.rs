//! SVG charts (plotters)
//!
//! - Single run: encode and decode histograms side by side, BLER/BER in a
//!   side panel, optional title.
//! - Stubs: a grid of decode-time histograms above a grid of encode-time
//!   histograms, one cell per stub in sorted order.
//! - Summary: Es/No vs average decode time scatter, one labelled point per stub.

use super::histogram::Histogram;
use super::Report;
use anyhow::{anyhow, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use sim_log_decoder::{RunStatistics, SummaryPoint};
use std::collections::BTreeMap;
use std::ops::Range;
use std::path::Path;

const ENCODE_COLOR: RGBColor = RGBColor(70, 130, 180);
const DECODE_COLOR: RGBColor = RGBColor(250, 128, 114);
const FONT: &str = "sans-serif";

const CELL_WIDTH: u32 = 400;
const CELL_HEIGHT: u32 = 300;
const PAGE_TITLE_HEIGHT: u32 = 40;

/// Render `report` as an SVG file at `path`
pub fn render(report: &Report, path: &Path, bins: usize) -> Result<()> {
    match report {
        Report::Single { title, stats } => render_single(path, title.as_deref(), stats, bins),
        Report::Stubs { stats } => render_stub_grid(path, stats, bins),
        Report::Summary { points } => render_summary(path, points),
    }
}

fn render_single(path: &Path, title: Option<&str>, stats: &RunStatistics, bins: usize) -> Result<()> {
    let root = SVGBackend::new(path, (1200, 420)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let body = match title {
        Some(title) => root.titled(title, (FONT, 24)).map_err(plot_error)?,
        None => root.clone(),
    };
    let (plots, side) = body.split_horizontally(1060);
    let panels = plots.split_evenly((1, 2));

    draw_histogram(
        &panels[0],
        "Encoding time distribution",
        "Time (µs)",
        &stats.encode_times,
        bins,
        ENCODE_COLOR,
    )?;
    draw_histogram(
        &panels[1],
        "Decoding time distribution",
        "Time (µs)",
        &stats.decode_times,
        bins,
        DECODE_COLOR,
    )?;

    let (_, height) = side.dim_in_pixel();
    let middle = height as i32 / 2;
    side.draw(&Text::new(format!("BLER = {:.4}", stats.bler), (10, middle - 14), (FONT, 16)))
        .map_err(plot_error)?;
    side.draw(&Text::new(format!("BER  = {:.4e}", stats.ber), (10, middle + 10), (FONT, 16)))
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    Ok(())
}

/// Columns used for a grid of `count` stubs
pub fn grid_columns(count: usize) -> usize {
    if count > 4 {
        3
    } else {
        2
    }
}

fn render_stub_grid(path: &Path, stats: &BTreeMap<String, RunStatistics>, bins: usize) -> Result<()> {
    let cols = grid_columns(stats.len());
    let rows = stats.len().div_ceil(cols).max(1);
    let page_height = PAGE_TITLE_HEIGHT + CELL_HEIGHT * rows as u32;

    let root = SVGBackend::new(path, (CELL_WIDTH * cols as u32, page_height * 2)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    // Decode page first: it is usually the metric of interest
    let (decode_page, encode_page) = root.split_vertically(page_height);
    let pages = [
        (decode_page, "Decoding time", "Dec time (µs)", DECODE_COLOR, true),
        (encode_page, "Encoding time", "Enc time (µs)", ENCODE_COLOR, false),
    ];

    for (page, page_title, x_desc, color, decode) in pages {
        let page = page.titled(page_title, (FONT, 22)).map_err(plot_error)?;
        let cells = page.split_evenly((rows, cols));

        for ((stub, run), cell) in stats.iter().zip(cells.iter()) {
            let samples = if decode { &run.decode_times } else { &run.encode_times };
            draw_histogram(cell, stub, x_desc, samples, bins, color)?;
            annotate_rates(cell, run)?;
        }
    }

    root.present().map_err(plot_error)?;
    Ok(())
}

fn render_summary(path: &Path, points: &BTreeMap<String, SummaryPoint>) -> Result<()> {
    let root = SVGBackend::new(path, (720, 480)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let x_range = padded_range(points.values().map(|p| p.esno));
    let y_range = padded_range(points.values().map(|p| p.avg_decode_time));

    let mut chart = ChartBuilder::on(&root)
        .caption("Decoder comparison", (FONT, 22))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(65)
        .build_cartesian_2d(x_range, y_range)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc("Es/No (dB)")
        .y_desc("Average decoding time (µs)")
        .draw()
        .map_err(plot_error)?;

    chart
        .draw_series(points.iter().enumerate().map(|(i, (stub, point))| {
            let color = Palette99::pick(i);
            EmptyElement::at((point.esno, point.avg_decode_time))
                + Circle::new((0, 0), 5, color.filled())
                + Text::new(stub.clone(), (7, 2), (FONT, 13))
        }))
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    Ok(())
}

fn draw_histogram<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    caption: &str,
    x_desc: &str,
    samples: &[f64],
    bins: usize,
    color: RGBColor,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let Some(hist) = Histogram::from_samples(samples, bins) else {
        log::warn!("Nothing to plot for '{}'", caption);
        return Ok(());
    };

    let x_range = padded_range([hist.min, hist.max].into_iter());
    let y_max = (hist.max_count().max(1) as f64) * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption(caption, (FONT, 16))
        .margin(8)
        .x_label_area_size(35)
        .y_label_area_size(45)
        .build_cartesian_2d(x_range, 0f64..y_max)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc("Count")
        .x_labels(6)
        .draw()
        .map_err(plot_error)?;

    // Constant samples: draw one bar of unit width centred on the value
    let bars: Vec<(f64, f64, usize)> = if hist.bin_width() > 0.0 {
        hist.bins().collect()
    } else {
        vec![(hist.min - 0.5, hist.min + 0.5, hist.total())]
    };

    chart
        .draw_series(bars.iter().map(|&(start, end, count)| {
            Rectangle::new([(start, 0.0), (end, count as f64)], color.mix(0.7).filled())
        }))
        .map_err(plot_error)?;
    chart
        .draw_series(bars.iter().map(|&(start, end, count)| {
            Rectangle::new([(start, 0.0), (end, count as f64)], BLACK.stroke_width(1))
        }))
        .map_err(plot_error)?;

    Ok(())
}

fn annotate_rates<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, stats: &RunStatistics) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let (width, _) = area.dim_in_pixel();
    let x = width as i32 - 130;
    area.draw(&Text::new(format!("BLER={:.4}", stats.bler), (x, 30), (FONT, 11)))
        .map_err(plot_error)?;
    area.draw(&Text::new(format!("BER={:.3e}", stats.ber), (x, 44), (FONT, 11)))
        .map_err(plot_error)?;
    Ok(())
}

/// Range covering `values` with 5% padding; a point range is widened by ±1
pub fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if !lo.is_finite() {
        return 0.0..1.0;
    }
    let span = hi - lo;
    if span <= f64::EPSILON * lo.abs().max(1.0) {
        return (lo - 1.0)..(hi + 1.0);
    }
    let pad = span * 0.05;
    (lo - pad)..(hi + pad)
}

fn plot_error<E: std::fmt::Debug>(e: E) -> anyhow::Error {
    anyhow!("Chart rendering failed: {:?}", e)
}
