//! Overhead comparisons between size-tracking variants and their baselines.
//!
//! Bars show the relative throughput loss per workload-thread count, either as
//! one bar per thread count or split into per-operation-type groups. Lines
//! show the absolute throughput of both variants side by side.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use plotters::prelude::*;
use tracing::info;

use crate::results::key::{self, OpType};
use crate::results::AggregatedResults;

use super::style::StylePalette;
use super::{draw_line, legend, required, sole, AXIS_FONT, CHART_SIZE, FALLBACK_COLOR, TICK_FONT};

/// Width of one bar in a split-mode operation-type group, in x-axis units.
const SPLIT_BAR_WIDTH: f64 = 0.2;

/// Fixed dimensions of an overhead scan: everything but the workload-thread
/// count must hold a single value.
struct OverheadScan {
    size_threads: u32,
    init_size: u64,
    ratio: String,
    workload_threads: Vec<u32>,
}

fn overhead_scan(results: &AggregatedResults) -> Result<OverheadScan> {
    let dims = &results.dimensions;
    let size_threads = *sole(&dims.size_threads, "size-thread count")?;
    let init_size = *sole(&dims.init_sizes, "initial size")?;
    let ratio = sole(&dims.ratios, "percentage ratio")?.clone();
    let mut workload_threads = dims.workload_threads.clone();
    workload_threads.sort_unstable();
    Ok(OverheadScan {
        size_threads,
        init_size,
        ratio,
        workload_threads,
    })
}

/// Renders one throughput-loss bar chart per size-tracking algorithm present
/// in the results. Returns the paths of the charts written.
pub fn render_overhead_bars(
    results: &AggregatedResults,
    palette: &StylePalette,
    graphs_dir: &Path,
    graph_name: &str,
    benchmark_name: &str,
    split: bool,
) -> Result<Vec<PathBuf>> {
    let scan = overhead_scan(results)?;
    let mut written = Vec::new();

    for algorithm in &results.dimensions.algorithms {
        let Some(baseline) = key::baseline_name(algorithm) else {
            continue;
        };
        let path =
            graphs_dir.join(format!("{graph_name}_bars_{algorithm}_{benchmark_name}.svg"));
        let drawn = if split {
            split_bars(results, palette, &scan, algorithm, baseline, &path)?
        } else {
            plain_bars(results, palette, &scan, algorithm, baseline, &path)?
        };
        if drawn {
            info!(chart = %path.display(), "rendered overhead bars");
            written.push(path);
        }
    }

    if split {
        let entries: Vec<(&str, _)> = OpType::ALL
            .iter()
            .map(|op| (op.label(), palette.split_color(*op)))
            .collect();
        legend::export_swatch_legend(
            &graphs_dir.join("legend_overhead_split_bars.svg"),
            &entries,
        )?;
    }

    Ok(written)
}

/// Throughput loss of the size-tracking variant against its baseline, in
/// percent. The baseline always runs with zero size threads.
fn loss_percent(
    throughput: &BTreeMap<String, f64>,
    scan: &OverheadScan,
    algorithm: &str,
    baseline: &str,
    workload_threads: u32,
    op_type: Option<OpType>,
) -> Result<Option<f64>> {
    let (current, base) = match op_type {
        None => (
            key::config_key(
                algorithm,
                workload_threads,
                scan.size_threads,
                scan.init_size,
                &scan.ratio,
            ),
            key::config_key(baseline, workload_threads, 0, scan.init_size, &scan.ratio),
        ),
        Some(op) => (
            key::split_config_key(
                algorithm,
                workload_threads,
                scan.size_threads,
                scan.init_size,
                &scan.ratio,
                op,
            ),
            key::split_config_key(baseline, workload_threads, 0, scan.init_size, &scan.ratio, op),
        ),
    };

    let Some(value) = throughput.get(&current).copied() else {
        return Ok(None);
    };
    let base = required(throughput, &base)?;
    Ok(Some(100.0 - value / base * 100.0))
}

fn plain_bars(
    results: &AggregatedResults,
    palette: &StylePalette,
    scan: &OverheadScan,
    algorithm: &str,
    baseline: &str,
    path: &Path,
) -> Result<bool> {
    let mut bars = Vec::new();
    for &threads in &scan.workload_threads {
        if let Some(loss) =
            loss_percent(&results.throughput, scan, algorithm, baseline, threads, None)?
        {
            bars.push((threads as f64, loss));
        }
    }
    if bars.is_empty() {
        return Ok(false);
    }

    let y_max = bars.iter().map(|(_, v)| *v).fold(10.0_f64, f64::max) + 2.0;
    let y_min = bars.iter().map(|(_, v)| *v).fold(0.0_f64, f64::min);
    let min_gap = scan
        .workload_threads
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .min()
        .unwrap_or(1);
    let width = 0.75 * min_gap as f64;
    let x_min = bars[0].0 - width;
    let x_max = bars[bars.len() - 1].0 + width;

    let color = palette
        .style(algorithm)
        .map(|style| style.color)
        .unwrap_or(FALLBACK_COLOR)
        .color();

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(palette.label(algorithm), AXIS_FONT)
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len().min(10))
        .x_label_formatter(&|x| format!("{x:.0}"))
        .x_desc("Workload threads")
        .y_desc("% TP loss")
        .label_style(TICK_FONT)
        .axis_desc_style(AXIS_FONT)
        .draw()?;

    chart.draw_series(bars.iter().map(|&(x, loss)| {
        Rectangle::new([(x - width / 2.0, 0.0), (x + width / 2.0, loss)], color.filled())
    }))?;
    // Zero line separating gain from loss.
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(x_min, 0.0), (x_max, 0.0)],
        BLACK.stroke_width(1),
    )))?;

    root.present()?;
    Ok(true)
}

fn split_bars(
    results: &AggregatedResults,
    palette: &StylePalette,
    scan: &OverheadScan,
    algorithm: &str,
    baseline: &str,
    path: &Path,
) -> Result<bool> {
    // Collect every group's bars before building the chart so the y range
    // covers all operation types.
    let mut groups: Vec<(OpType, Vec<(usize, f64)>)> = Vec::new();
    for op_type in OpType::ALL {
        let mut bars = Vec::new();
        for (index, &threads) in scan.workload_threads.iter().enumerate() {
            if let Some(loss) = loss_percent(
                &results.throughput,
                scan,
                algorithm,
                baseline,
                threads,
                Some(op_type),
            )? {
                bars.push((index, loss));
            }
        }
        if !bars.is_empty() {
            groups.push((op_type, bars));
        }
    }
    if groups.is_empty() {
        return Ok(false);
    }

    let all_losses = groups.iter().flat_map(|(_, bars)| bars.iter().map(|(_, v)| *v));
    let y_max = all_losses.clone().fold(10.0_f64, f64::max) + 2.0;
    let y_min = all_losses.fold(0.0_f64, f64::min);
    let thread_count = scan.workload_threads.len();

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(palette.label(algorithm), AXIS_FONT)
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..(thread_count as f64 - 0.5), y_min..y_max)?;
    let workload_threads = scan.workload_threads.clone();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(thread_count)
        .x_label_formatter(&|x| {
            let index = x.round() as usize;
            if index < workload_threads.len() && (x - index as f64).abs() < 0.3 {
                workload_threads[index].to_string()
            } else {
                String::new()
            }
        })
        .x_desc("Workload threads")
        .y_desc("% TP loss")
        .label_style(TICK_FONT)
        .axis_desc_style(AXIS_FONT)
        .draw()?;

    for (position, (op_type, bars)) in groups.iter().enumerate() {
        let color = palette.split_color(*op_type).color();
        let offset = key::bar_offset(position, OpType::ALL.len(), SPLIT_BAR_WIDTH);
        chart.draw_series(bars.iter().map(|&(index, loss)| {
            let center = index as f64 + offset;
            Rectangle::new(
                [
                    (center - SPLIT_BAR_WIDTH / 2.0 + 0.01, 0.0),
                    (center + SPLIT_BAR_WIDTH / 2.0 - 0.01, loss),
                ],
                color.filled(),
            )
        }))?;
    }
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(-0.5, 0.0), (thread_count as f64 - 0.5, 0.0)],
        BLACK.stroke_width(1),
    )))?;

    root.present()?;
    Ok(true)
}

/// Renders throughput line charts comparing every size-tracking algorithm
/// against its baseline, one chart per pair, with separately exported legends.
/// Every expected key must be present.
pub fn render_overhead_lines(
    results: &AggregatedResults,
    palette: &StylePalette,
    graphs_dir: &Path,
    graph_name: &str,
    benchmark_name: &str,
) -> Result<Vec<PathBuf>> {
    let scan = overhead_scan(results)?;
    let mut written = Vec::new();

    for algorithm in &results.dimensions.algorithms {
        let Some(baseline) = key::baseline_name(algorithm) else {
            continue;
        };

        let mut tracked = Vec::new();
        let mut untracked = Vec::new();
        for &threads in &scan.workload_threads {
            let tracked_key = key::config_key(
                algorithm,
                threads,
                scan.size_threads,
                scan.init_size,
                &scan.ratio,
            );
            let baseline_key =
                key::config_key(baseline, threads, 0, scan.init_size, &scan.ratio);
            tracked.push((threads as f64, required(&results.throughput, &tracked_key)?));
            untracked.push((threads as f64, required(&results.throughput, &baseline_key)?));
        }

        let y_max = tracked
            .iter()
            .chain(&untracked)
            .map(|(_, v)| *v)
            .fold(0.0_f64, f64::max);
        let (x_min, x_max) = super::padded_span(tracked[0].0, tracked[tracked.len() - 1].0);

        let path =
            graphs_dir.join(format!("{graph_name}_lines_{algorithm}_{benchmark_name}.svg"));
        let mut entries = Vec::new();
        // Scoped so the backend's borrow of the path ends before it is moved.
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
                .x_labels(scan.workload_threads.len().min(10))
                .x_label_formatter(&|x| format!("{x:.0}"))
                .x_desc("Workload threads")
                .y_desc("Workload threads total TP (Mop/s)")
                .label_style(TICK_FONT)
                .axis_desc_style(AXIS_FONT)
                .draw()?;

            for (name, points) in [(baseline, &untracked), (algorithm.as_str(), &tracked)] {
                if let Some(series_style) = palette.style(name) {
                    draw_line(&mut chart, points, series_style)?;
                    entries.push((palette.label(name), series_style));
                }
            }
            root.present()?;
        }

        legend::export_series_legend(
            &graphs_dir.join(format!("legend_overhead_lines_{algorithm}.svg")),
            &entries,
        )?;
        info!(chart = %path.display(), "rendered overhead lines");
        written.push(path);
    }

    Ok(written)
}
