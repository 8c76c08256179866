//! Turns raw trial rows into per-configuration throughput statistics and the
//! derived `_statistics.csv` file.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use super::key::{self, OpType};
use super::reader::{self, ResultRow, ResultsError};
use super::stats;

/// Which of the two throughput figures a row contributes in non-split mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThroughputMetric {
    /// Total operations performed by the workload threads, reported in Mop/s.
    WorkloadThreads,
    /// Size-query completions by the size threads, reported in Kop/s.
    SizeThreads,
}

impl ThroughputMetric {
    fn sample(&self, row: &ResultRow) -> f64 {
        match self {
            ThroughputMetric::WorkloadThreads => row.workload_threads_throughput as f64,
            ThroughputMetric::SizeThreads => row.size_threads_throughput as f64,
        }
    }

    /// Divisor normalizing the raw per-second counts into the reporting unit.
    fn unit_divisor(&self) -> f64 {
        match self {
            ThroughputMetric::WorkloadThreads => 1_000_000.0,
            ThroughputMetric::SizeThreads => 1_000.0,
        }
    }
}

/// Aggregation parameters.
#[derive(Debug, Clone, Copy)]
pub struct AggregateOptions {
    /// Leading trial repetitions excluded from the statistics.
    pub warmup_repeats: usize,
    pub metric: ThroughputMetric,
    /// Split every configuration into per-operation-type keys instead of one
    /// raw-throughput key.
    pub split_by_op_type: bool,
}

/// Aggregated view of one results file, keyed by configuration string.
#[derive(Debug, Clone, Default)]
pub struct AggregatedResults {
    /// Mean throughput per configuration. In non-split mode the values are
    /// rescaled to the metric's reporting unit; split-mode values keep the
    /// raw per-elapsed-time scale.
    pub throughput: BTreeMap<String, f64>,
    /// Population standard deviation per configuration, raw scale.
    pub stddev: BTreeMap<String, f64>,
    pub dimensions: reader::Dimensions,
}

/// Path of the derived statistics file written next to the input.
pub fn statistics_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("results");
    path.with_file_name(format!("{stem}_statistics.csv"))
}

/// Reads a results file, groups its rows into configuration keys, computes
/// the per-key statistics (discarding the warm-up prefix), and writes the
/// derived statistics file beside the input.
pub fn aggregate_results_file(
    path: &Path,
    options: &AggregateOptions,
) -> Result<AggregatedResults, ResultsError> {
    let raw = reader::read_results(path)?;

    let mut samples: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for row in &raw.rows {
        if options.split_by_op_type {
            for op_type in OpType::ALL {
                let key = key::split_config_key(
                    &row.name,
                    row.workload_threads,
                    row.size_threads,
                    row.init_size,
                    &row.percentage_ratio,
                    op_type,
                );
                let sample =
                    op_type_throughput(row, op_type).ok_or_else(|| ResultsError::ZeroElapsed {
                        key: key.clone(),
                        op: op_type.label(),
                    })?;
                samples.entry(key).or_default().push(sample);
            }
        } else {
            let key = key::config_key(
                &row.name,
                row.workload_threads,
                row.size_threads,
                row.init_size,
                &row.percentage_ratio,
            );
            samples.entry(key).or_default().push(options.metric.sample(row));
        }
    }

    let stats_path = statistics_path(path);
    let mut stats_file = create(&stats_path)?;
    writeln!(stats_file, "benchmark,meanTP,stddev,CV").map_err(|source| io_error(&stats_path, source))?;

    let mut aggregated = AggregatedResults {
        dimensions: raw.dimensions,
        ..AggregatedResults::default()
    };

    for (key, series) in &samples {
        let measured = &series[options.warmup_repeats.min(series.len())..];
        let agg = stats::summarize(measured);
        writeln!(
            stats_file,
            "{key},{:.3},{:.3},{:.3}",
            agg.mean, agg.stddev, agg.cv
        )
        .map_err(|source| io_error(&stats_path, source))?;

        // The statistics file keeps the raw scale; the returned map is
        // rescaled to the reporting unit in non-split mode.
        let mean = if options.split_by_op_type {
            agg.mean
        } else {
            agg.mean / options.metric.unit_divisor()
        };
        aggregated.throughput.insert(key.clone(), mean);
        aggregated.stddev.insert(key.clone(), agg.stddev);
    }

    info!(
        configurations = aggregated.throughput.len(),
        statistics = %stats_path.display(),
        "aggregated results file"
    );
    Ok(aggregated)
}

/// Per-operation-type throughput of one trial: completed operations of that
/// type (succeeded plus failed) over the elapsed time attributed to it. The
/// `All` bucket sums the three operation types over their combined time.
/// Returns `None` when the attributed elapsed time is zero; the caller treats
/// that as a fatal record rather than letting infinities reach the output.
fn op_type_throughput(row: &ResultRow, op_type: OpType) -> Option<f64> {
    let (ops, elapsed) = match op_type {
        OpType::All => (
            row.insert_succeeded
                + row.insert_failed
                + row.delete_succeeded
                + row.delete_failed
                + row.contains_succeeded
                + row.contains_failed,
            row.insert_elapsed + row.delete_elapsed + row.contains_elapsed,
        ),
        OpType::Insert => (row.insert_succeeded + row.insert_failed, row.insert_elapsed),
        OpType::Delete => (row.delete_succeeded + row.delete_failed, row.delete_elapsed),
        OpType::Contains => (
            row.contains_succeeded + row.contains_failed,
            row.contains_elapsed,
        ),
    };
    if elapsed <= 0.0 {
        return None;
    }
    Some(ops as f64 / elapsed)
}

fn create(path: &Path) -> Result<File, ResultsError> {
    File::create(path).map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> ResultsError {
    ResultsError::Io {
        path: path.display().to_string(),
        source,
    }
}
