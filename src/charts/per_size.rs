//! Per-initial-size throughput curves on a logarithmic size axis.
//!
//! The size-tracking family and the plain family are rendered as separate
//! charts so their very different throughput ranges stay readable.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Result};
use plotters::prelude::*;
use tracing::info;

use crate::results::key;
use crate::results::AggregatedResults;

use super::style::StylePalette;
use super::{draw_line, legend, sole, AXIS_FONT, CHART_SIZE, TICK_FONT};

#[derive(Debug, Clone, Copy)]
pub struct PerSizeOptions {
    /// Draw the size-tracking algorithms when true, the plain ones otherwise.
    pub show_size_algorithms: bool,
    /// Base of the logarithmic x axis. Always supplied by the caller.
    pub x_log_base: f64,
}

/// Renders one per-size chart and its legend. Algorithms missing a data point
/// for any initial size are dropped from the chart. Returns the chart path.
pub fn render_per_size(
    results: &AggregatedResults,
    palette: &StylePalette,
    graphs_dir: &Path,
    benchmark_name: &str,
    options: PerSizeOptions,
) -> Result<PathBuf> {
    ensure!(
        options.x_log_base > 1.0,
        "x-axis log base must be greater than 1, got {}",
        options.x_log_base
    );

    let dims = &results.dimensions;
    let workload_threads = *sole(&dims.workload_threads, "workload-thread count")?;
    let size_threads = *sole(&dims.size_threads, "size-thread count")?;
    let ratio = &dims.ratios[0];
    let mut init_sizes = dims.init_sizes.clone();
    init_sizes.sort_unstable();

    let mut series: Vec<(&str, Vec<(f64, f64)>)> = Vec::new();
    for algorithm in palette.legend_order() {
        if !dims.algorithms.contains(algorithm)
            || key::is_size_tracking(algorithm) != options.show_size_algorithms
        {
            continue;
        }
        let points: Option<Vec<(f64, f64)>> = init_sizes
            .iter()
            .map(|&init_size| {
                let config =
                    key::config_key(algorithm, workload_threads, size_threads, init_size, ratio);
                results
                    .throughput
                    .get(&config)
                    .map(|&value| (init_size as f64, value))
            })
            .collect();
        if let Some(points) = points {
            series.push((algorithm.as_str(), points));
        }
    }

    let y_max = series
        .iter()
        .flat_map(|(_, points)| points.iter().map(|(_, v)| *v))
        .fold(0.0_f64, f64::max);
    let mut x_min = init_sizes.first().copied().unwrap_or(1) as f64;
    let mut x_max = init_sizes.last().copied().unwrap_or(1) as f64;
    // A lone size would give an empty range; widen by one log step instead.
    if x_min >= x_max {
        x_min /= options.x_log_base;
        x_max *= options.x_log_base;
    }
    let y_desc = if size_threads == 1 {
        "Size thread TP (Kop/s)"
    } else {
        "Size threads total TP (Kop/s)"
    };

    let suffix = if options.show_size_algorithms {
        ""
    } else {
        "_others"
    };
    let path = graphs_dir.join(format!("per_size{suffix}_{benchmark_name}.svg"));
    let mut entries = Vec::new();
    // Scoped so the backend's borrow of the path ends before it is returned.
    {
        let root = SVGBackend::new(&path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(
                (x_min..x_max).log_scale().base(options.x_log_base),
                -0.02 * y_max..y_max * 1.05,
            )?;
        chart
            .configure_mesh()
            .x_labels(init_sizes.len())
            .x_label_formatter(&|x| format!("{x:.0e}"))
            .x_desc("Data structure size")
            .y_desc(y_desc)
            .label_style(TICK_FONT)
            .axis_desc_style(AXIS_FONT)
            .draw()?;

        for (algorithm, points) in &series {
            if let Some(series_style) = palette.style(algorithm) {
                draw_line(&mut chart, points, series_style)?;
                entries.push((palette.label(algorithm), series_style));
            }
        }
        root.present()?;
    }

    legend::export_series_legend(
        &graphs_dir.join(format!("legend_per_size{suffix}.svg")),
        &entries,
    )?;
    info!(chart = %path.display(), "rendered per-size chart");
    Ok(path)
}
