//! Size-thread scalability chart: total size-operation throughput of each
//! size-tracking algorithm as the number of dedicated size threads grows.

use std::path::{Path, PathBuf};

use anyhow::Result;
use plotters::prelude::*;
use tracing::info;

use crate::results::key;
use crate::results::AggregatedResults;

use super::style::StylePalette;
use super::{draw_line, legend, padded_span, sole, AXIS_FONT, CHART_SIZE, TICK_FONT};

/// Renders the scalability chart and its legend. Algorithms missing a data
/// point for any size-thread count are dropped from the chart. Returns the
/// chart path.
pub fn render_scalability(
    results: &AggregatedResults,
    palette: &StylePalette,
    graphs_dir: &Path,
    benchmark_name: &str,
) -> Result<PathBuf> {
    let dims = &results.dimensions;
    let workload_threads = *sole(&dims.workload_threads, "workload-thread count")?;
    let init_size = dims.init_sizes[0];
    let ratio = &dims.ratios[0];
    let mut size_threads = dims.size_threads.clone();
    size_threads.sort_unstable();

    // Only algorithms with a complete series are drawn.
    let mut series: Vec<(&str, Vec<(f64, f64)>)> = Vec::new();
    for algorithm in palette.legend_order() {
        if !dims.algorithms.contains(algorithm) {
            continue;
        }
        let points: Option<Vec<(f64, f64)>> = size_threads
            .iter()
            .map(|&s| {
                let config = key::config_key(algorithm, workload_threads, s, init_size, ratio);
                results
                    .throughput
                    .get(&config)
                    .map(|&value| (s as f64, value))
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
    let (x_min, x_max) = padded_span(
        size_threads.first().copied().unwrap_or(1) as f64,
        size_threads.last().copied().unwrap_or(1) as f64,
    );

    let path = graphs_dir.join(format!("scalability_sizeThreads_{benchmark_name}.svg"));
    let mut entries = Vec::new();
    // Scoped so the backend's borrow of the path ends before it is returned.
    {
        let root = SVGBackend::new(&path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, -0.02 * y_max..y_max * 1.02)?;
        chart
            .configure_mesh()
            .x_labels(size_threads.len().min(10))
            .x_label_formatter(&|x| format!("{x:.0}"))
            .x_desc("Size threads")
            .y_desc("Size threads total TP (Kop/s)")
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

    legend::export_series_legend(&graphs_dir.join("legend_scalability.svg"), &entries)?;
    info!(chart = %path.display(), "rendered scalability chart");
    Ok(path)
}
