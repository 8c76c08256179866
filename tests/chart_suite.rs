use std::fs;

use tempfile::TempDir;

use sizebench::charts::overhead::{render_overhead_bars, render_overhead_lines};
use sizebench::charts::per_size::{render_per_size, PerSizeOptions};
use sizebench::charts::scalability::render_scalability;
use sizebench::results::key::{config_key, split_config_key, OpType};
use sizebench::{AggregatedResults, Dimensions, StylePalette};

const RATIO: &str = "3i-2d-95size";

fn overhead_results(workload_threads: &[u32]) -> AggregatedResults {
    let mut results = AggregatedResults {
        dimensions: Dimensions {
            workload_threads: workload_threads.to_vec(),
            size_threads: vec![1],
            ratios: vec![RATIO.to_string()],
            init_sizes: vec![10_000],
            algorithms: vec!["BST".to_string(), "SizeBST".to_string()],
        },
        ..AggregatedResults::default()
    };
    for (i, &threads) in workload_threads.iter().enumerate() {
        let scale = (i + 1) as f64;
        results
            .throughput
            .insert(config_key("BST", threads, 0, 10_000, RATIO), 10.0 * scale);
        results
            .throughput
            .insert(config_key("SizeBST", threads, 1, 10_000, RATIO), 9.0 * scale);
    }
    results
}

fn assert_svg(path: &std::path::Path) {
    let content = fs::read_to_string(path).unwrap();
    assert!(content.contains("<svg"), "{} is not an SVG", path.display());
}

#[test]
fn overhead_bars_render_one_chart_per_size_algorithm() {
    let dir = TempDir::new().unwrap();
    let results = overhead_results(&[1, 4, 8]);
    let palette = StylePalette::default();

    let charts = render_overhead_bars(
        &results,
        &palette,
        dir.path(),
        "overhead",
        "10000setSize_3ins-2rem_1sizeThreads",
        false,
    )
    .unwrap();

    assert_eq!(charts.len(), 1);
    assert!(charts[0]
        .file_name()
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("overhead_bars_SizeBST_"));
    assert_svg(&charts[0]);
}

#[test]
fn overhead_bars_fail_without_the_baseline_key() {
    let dir = TempDir::new().unwrap();
    let mut results = overhead_results(&[1, 4]);
    results
        .throughput
        .remove(&config_key("BST", 4, 0, 10_000, RATIO));

    let err = render_overhead_bars(
        &results,
        &StylePalette::default(),
        dir.path(),
        "overhead",
        "bench",
        false,
    );
    assert!(err.is_err());
}

#[test]
fn overhead_bars_reject_multiple_init_sizes() {
    let dir = TempDir::new().unwrap();
    let mut results = overhead_results(&[1]);
    results.dimensions.init_sizes.push(100_000);

    let err = render_overhead_bars(
        &results,
        &StylePalette::default(),
        dir.path(),
        "overhead",
        "bench",
        false,
    );
    assert!(err.is_err());
}

#[test]
fn split_bars_write_the_operation_type_legend() {
    let dir = TempDir::new().unwrap();
    let mut results = overhead_results(&[1, 4]);
    for &threads in &[1u32, 4] {
        for op in OpType::ALL {
            results.throughput.insert(
                split_config_key("BST", threads, 0, 10_000, RATIO, op),
                200.0,
            );
            results.throughput.insert(
                split_config_key("SizeBST", threads, 1, 10_000, RATIO, op),
                150.0,
            );
        }
    }

    let charts = render_overhead_bars(
        &results,
        &StylePalette::default(),
        dir.path(),
        "overhead_split",
        "bench",
        true,
    )
    .unwrap();

    assert_eq!(charts.len(), 1);
    assert_svg(&charts[0]);
    assert_svg(&dir.path().join("legend_overhead_split_bars.svg"));
}

#[test]
fn overhead_lines_render_chart_and_legend() {
    let dir = TempDir::new().unwrap();
    let results = overhead_results(&[1, 4, 8]);

    let charts = render_overhead_lines(
        &results,
        &StylePalette::default(),
        dir.path(),
        "overhead",
        "bench",
    )
    .unwrap();

    assert_eq!(charts.len(), 1);
    assert_svg(&charts[0]);
    assert_svg(&dir.path().join("legend_overhead_lines_SizeBST.svg"));
}

#[test]
fn overhead_lines_fail_when_a_point_is_missing() {
    let dir = TempDir::new().unwrap();
    let mut results = overhead_results(&[1, 4]);
    results
        .throughput
        .remove(&config_key("SizeBST", 4, 1, 10_000, RATIO));

    let err = render_overhead_lines(
        &results,
        &StylePalette::default(),
        dir.path(),
        "overhead",
        "bench",
    );
    assert!(err.is_err());
}

#[test]
fn scalability_drops_algorithms_with_incomplete_series() {
    let dir = TempDir::new().unwrap();
    let mut results = AggregatedResults {
        dimensions: Dimensions {
            workload_threads: vec![32],
            size_threads: vec![1, 2, 4],
            ratios: vec![RATIO.to_string()],
            init_sizes: vec![10_000],
            algorithms: vec!["SizeBST".to_string(), "SizeSkipList".to_string()],
        },
        ..AggregatedResults::default()
    };
    for &size_threads in &[1u32, 2, 4] {
        results.throughput.insert(
            config_key("SizeBST", 32, size_threads, 10_000, RATIO),
            5.0 * size_threads as f64,
        );
    }
    // SizeSkipList only has a single point and must be dropped silently.
    results
        .throughput
        .insert(config_key("SizeSkipList", 32, 1, 10_000, RATIO), 3.0);

    let chart = render_scalability(&results, &StylePalette::default(), dir.path(), "bench").unwrap();
    assert_eq!(
        chart.file_name().unwrap().to_str().unwrap(),
        "scalability_sizeThreads_bench.svg"
    );
    assert_svg(&chart);
    assert_svg(&dir.path().join("legend_scalability.svg"));
}

#[test]
fn per_size_renders_each_family_separately() {
    let dir = TempDir::new().unwrap();
    let mut results = AggregatedResults {
        dimensions: Dimensions {
            workload_threads: vec![32],
            size_threads: vec![1],
            ratios: vec![RATIO.to_string()],
            init_sizes: vec![10_000, 100_000, 1_000_000],
            algorithms: vec!["SizeBST".to_string(), "IteratorSkipList".to_string()],
        },
        ..AggregatedResults::default()
    };
    for &init_size in &[10_000u64, 100_000, 1_000_000] {
        for alg in ["SizeBST", "IteratorSkipList"] {
            results
                .throughput
                .insert(config_key(alg, 32, 1, init_size, RATIO), 42.0);
        }
    }
    let palette = StylePalette::default();

    let tracked = render_per_size(
        &results,
        &palette,
        dir.path(),
        "bench",
        PerSizeOptions {
            show_size_algorithms: true,
            x_log_base: 10.0,
        },
    )
    .unwrap();
    let others = render_per_size(
        &results,
        &palette,
        dir.path(),
        "bench",
        PerSizeOptions {
            show_size_algorithms: false,
            x_log_base: 10.0,
        },
    )
    .unwrap();

    assert_eq!(tracked.file_name().unwrap().to_str().unwrap(), "per_size_bench.svg");
    assert_eq!(
        others.file_name().unwrap().to_str().unwrap(),
        "per_size_others_bench.svg"
    );
    assert_svg(&tracked);
    assert_svg(&others);
    assert_svg(&dir.path().join("legend_per_size.svg"));
    assert_svg(&dir.path().join("legend_per_size_others.svg"));
}

#[test]
fn overhead_lines_render_with_a_single_thread_count() {
    let dir = TempDir::new().unwrap();
    let results = overhead_results(&[4]);

    let charts = render_overhead_lines(
        &results,
        &StylePalette::default(),
        dir.path(),
        "overhead",
        "bench",
    )
    .unwrap();

    assert_eq!(charts.len(), 1);
    assert_svg(&charts[0]);
}

#[test]
fn scalability_renders_with_a_single_size_thread_count() {
    let dir = TempDir::new().unwrap();
    let mut results = AggregatedResults {
        dimensions: Dimensions {
            workload_threads: vec![32],
            size_threads: vec![1],
            ratios: vec![RATIO.to_string()],
            init_sizes: vec![10_000],
            algorithms: vec!["SizeBST".to_string()],
        },
        ..AggregatedResults::default()
    };
    results
        .throughput
        .insert(config_key("SizeBST", 32, 1, 10_000, RATIO), 5.0);

    let chart = render_scalability(&results, &StylePalette::default(), dir.path(), "bench").unwrap();
    assert_svg(&chart);
}

#[test]
fn per_size_renders_with_a_single_initial_size() {
    let dir = TempDir::new().unwrap();
    let mut results = AggregatedResults {
        dimensions: Dimensions {
            workload_threads: vec![32],
            size_threads: vec![1],
            ratios: vec![RATIO.to_string()],
            init_sizes: vec![10_000],
            algorithms: vec!["SizeBST".to_string()],
        },
        ..AggregatedResults::default()
    };
    results
        .throughput
        .insert(config_key("SizeBST", 32, 1, 10_000, RATIO), 42.0);

    let chart = render_per_size(
        &results,
        &StylePalette::default(),
        dir.path(),
        "bench",
        PerSizeOptions {
            show_size_algorithms: true,
            x_log_base: 10.0,
        },
    )
    .unwrap();
    assert_svg(&chart);
}

#[test]
fn per_size_rejects_a_degenerate_log_base() {
    let dir = TempDir::new().unwrap();
    let results = AggregatedResults::default();
    let err = render_per_size(
        &results,
        &StylePalette::default(),
        dir.path(),
        "bench",
        PerSizeOptions {
            show_size_algorithms: true,
            x_log_base: 1.0,
        },
    );
    assert!(err.is_err());
}
