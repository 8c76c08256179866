#[path = "common.rs"]
mod common;

use std::fs;

use tempfile::TempDir;

use common::{data_row, split_row, write_results, HEADER};
use sizebench::results::aggregate::statistics_path;
use sizebench::{aggregate_results_file, AggregateOptions, ThroughputMetric};

fn workload_options(warmup_repeats: usize) -> AggregateOptions {
    AggregateOptions {
        warmup_repeats,
        metric: ThroughputMetric::WorkloadThreads,
        split_by_op_type: false,
    }
}

#[test]
fn aggregates_united_file_and_writes_statistics() {
    let dir = TempDir::new().unwrap();
    // A united file carries one header per concatenated trial file.
    let rows = vec![
        data_row("BST", 4, 0, 10_000, 9_000_000, 0),
        HEADER.to_string(),
        data_row("BST", 4, 0, 10_000, 2_000_000, 0),
        data_row("BST", 4, 0, 10_000, 4_000_000, 0),
    ];
    let path = write_results(dir.path(), "overhead_10000setSize.csv", &rows);

    let results = aggregate_results_file(&path, &workload_options(1)).unwrap();
    let mean = results.throughput["BST-4w-0s-10000k-3i-2d-95size"];
    assert!((mean - 3.0).abs() < 1e-9, "warm-up row must be dropped, got {mean}");

    let stats = fs::read_to_string(statistics_path(&path)).unwrap();
    let mut lines = stats.lines();
    assert_eq!(lines.next(), Some("benchmark,meanTP,stddev,CV"));
    assert_eq!(
        lines.next(),
        Some("BST-4w-0s-10000k-3i-2d-95size,3000000.000,1000000.000,0.333")
    );
    assert_eq!(lines.next(), None);
}

#[test]
fn size_metric_uses_size_counters_and_kops_scale() {
    let dir = TempDir::new().unwrap();
    let rows = vec![
        data_row("SizeBST", 4, 1, 10_000, 1_000_000, 8_000),
        data_row("SizeBST", 4, 1, 10_000, 1_000_000, 6_000),
    ];
    let path = write_results(dir.path(), "scalability.csv", &rows);

    let options = AggregateOptions {
        warmup_repeats: 0,
        metric: ThroughputMetric::SizeThreads,
        split_by_op_type: false,
    };
    let results = aggregate_results_file(&path, &options).unwrap();
    let mean = results.throughput["SizeBST-4w-1s-10000k-3i-2d-95size"];
    assert!((mean - 7.0).abs() < 1e-9, "expected 7 Kop/s, got {mean}");
}

#[test]
fn split_mode_produces_one_key_per_operation_type() {
    let dir = TempDir::new().unwrap();
    let rows = vec![split_row(
        "SizeBST",
        4,
        1,
        10_000,
        [90, 10, 40, 10, 190, 10],
        [1.0, 0.5, 2.0],
    )];
    let path = write_results(dir.path(), "overhead_split.csv", &rows);

    let options = AggregateOptions {
        warmup_repeats: 0,
        metric: ThroughputMetric::WorkloadThreads,
        split_by_op_type: true,
    };
    let results = aggregate_results_file(&path, &options).unwrap();

    let base = "SizeBST-4w-1s-10000k-3i-2d-95size";
    for op in ["all", "insert", "delete", "contains"] {
        let value = results.throughput[&format!("{base}r-{op}")];
        assert!((value - 100.0).abs() < 1e-9, "{op}: got {value}");
    }
}

#[test]
fn split_mode_rejects_a_zero_elapsed_operation_time() {
    let dir = TempDir::new().unwrap();
    let rows = vec![split_row(
        "SizeBST",
        4,
        1,
        10_000,
        [90, 10, 40, 10, 190, 10],
        [0.0, 0.5, 2.0],
    )];
    let path = write_results(dir.path(), "overhead_split.csv", &rows);

    let options = AggregateOptions {
        warmup_repeats: 0,
        metric: ThroughputMetric::WorkloadThreads,
        split_by_op_type: true,
    };
    assert!(aggregate_results_file(&path, &options).is_err());
    // No statistics file with infinities is left behind.
    assert!(!statistics_path(&path).exists());
}

#[test]
fn unit_divisor_changes_scale_but_not_ordering() {
    let dir = TempDir::new().unwrap();
    // BST leads on workload throughput, SizeBST leads on size throughput.
    let rows = vec![
        data_row("BST", 4, 0, 10_000, 4_000_000, 1_000),
        data_row("SizeBST", 4, 1, 10_000, 2_000_000, 9_000),
    ];
    let path = write_results(dir.path(), "ordering.csv", &rows);

    let workload = aggregate_results_file(
        &path,
        &AggregateOptions {
            warmup_repeats: 0,
            metric: ThroughputMetric::WorkloadThreads,
            split_by_op_type: false,
        },
    )
    .unwrap();
    let size = aggregate_results_file(
        &path,
        &AggregateOptions {
            warmup_repeats: 0,
            metric: ThroughputMetric::SizeThreads,
            split_by_op_type: false,
        },
    )
    .unwrap();

    let bst = "BST-4w-0s-10000k-3i-2d-95size";
    let size_bst = "SizeBST-4w-1s-10000k-3i-2d-95size";
    assert!(workload.throughput[bst] > workload.throughput[size_bst]);
    assert!(size.throughput[size_bst] > size.throughput[bst]);
    // Rescaling preserves the raw ratios, not just the ordering.
    assert!((workload.throughput[bst] / workload.throughput[size_bst] - 2.0).abs() < 1e-9);
    assert!((size.throughput[size_bst] / size.throughput[bst] - 9.0).abs() < 1e-9);
}

#[test]
fn all_samples_warmed_up_yields_the_sentinel() {
    let dir = TempDir::new().unwrap();
    let rows = vec![data_row("BST", 1, 0, 100, 500, 0)];
    let path = write_results(dir.path(), "short.csv", &rows);

    aggregate_results_file(&path, &workload_options(3)).unwrap();
    let stats = fs::read_to_string(statistics_path(&path)).unwrap();
    assert!(
        stats.lines().any(|l| l == "BST-1w-0s-100k-3i-2d-95size,-1.000,0.000,-1.000"),
        "expected sentinel record, got:\n{stats}"
    );
}

#[test]
fn missing_results_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = aggregate_results_file(&dir.path().join("absent.csv"), &workload_options(1));
    assert!(err.is_err());
}
