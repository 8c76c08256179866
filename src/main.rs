use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sizebench::charts::overhead::{render_overhead_bars, render_overhead_lines};
use sizebench::charts::per_size::{render_per_size, PerSizeOptions};
use sizebench::charts::scalability::render_scalability;
use sizebench::results::aggregate::{aggregate_results_file, AggregateOptions, ThroughputMetric};
use sizebench::runner;
use sizebench::{ExperimentConfig, StylePalette, WorkloadRatio};

#[derive(Parser, Debug)]
#[command(name = "sizebench", about = "Benchmark harness for size-tracking data structures")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Insert-delete percentage ratio, e.g. `3-2`.
    #[arg(long, default_value = "3-2")]
    ratio: WorkloadRatio,

    /// Number of warm-up repeats discarded from every configuration.
    #[arg(long, default_value_t = 1)]
    warmup_repeats: u32,

    /// Number of measured repeats per configuration.
    #[arg(long, default_value_t = 5)]
    measured_repeats: u32,

    /// Runtime of a single trial in seconds.
    #[arg(long, default_value_t = 5.0)]
    runtime: f64,

    /// JVM heap size passed as both -Xms and -Xmx.
    #[arg(long, default_value = "8G")]
    jvm_heap: String,

    /// Path to the instrumented driver jar.
    #[arg(long, default_value = "build/experiments_instr.jar")]
    jar: PathBuf,

    /// Scratch directory for per-trial CSVs.
    #[arg(long, default_value = "build")]
    build_dir: PathBuf,

    /// Directory for united results files.
    #[arg(long, default_value = "results")]
    results_dir: PathBuf,

    /// Directory for rendered charts and legends.
    #[arg(long, default_value = "graphs")]
    graphs_dir: PathBuf,

    /// Run the Java driver before rendering. Without this flag the charts are
    /// re-rendered from the existing united results file.
    #[arg(long, default_value_t = false)]
    run: bool,
}

impl CommonArgs {
    fn config(&self) -> ExperimentConfig {
        ExperimentConfig {
            jar: self.jar.clone(),
            jvm_heap: self.jvm_heap.clone(),
            runtime_secs: self.runtime,
            warmup_repeats: self.warmup_repeats,
            measured_repeats: self.measured_repeats,
            build_dir: self.build_dir.clone(),
            results_dir: self.results_dir.clone(),
            graphs_dir: self.graphs_dir.clone(),
            ..ExperimentConfig::default()
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Throughput-loss bar charts of each size-tracking structure against its
    /// baseline, per workload-thread count.
    OverheadBars {
        #[command(flatten)]
        common: CommonArgs,

        /// Initial data structure size.
        #[arg(long, default_value_t = 10_000)]
        init_size: u64,

        /// Workload-thread counts to sweep.
        #[arg(long, value_delimiter = ',', default_values_t = [1u32, 4, 8])]
        workload_threads: Vec<u32>,

        /// Size threads given to the size-tracking structures.
        #[arg(long, default_value_t = 1)]
        size_threads: u32,

        /// Split every bar into all/insert/delete/contains groups.
        #[arg(long, default_value_t = false)]
        split: bool,
    },

    /// Absolute throughput lines of each size-tracking structure next to its
    /// baseline, across workload-thread counts.
    OverheadLines {
        #[command(flatten)]
        common: CommonArgs,

        /// Initial data structure size.
        #[arg(long, default_value_t = 10_000)]
        init_size: u64,

        /// Workload-thread counts to sweep.
        #[arg(long, value_delimiter = ',', default_values_t = [1u32, 4, 8])]
        workload_threads: Vec<u32>,

        /// Size threads given to the size-tracking structures.
        #[arg(long, default_value_t = 1)]
        size_threads: u32,
    },

    /// Size-operation throughput across size-thread counts.
    Scalability {
        #[command(flatten)]
        common: CommonArgs,

        /// Initial data structure size.
        #[arg(long, default_value_t = 10_000)]
        init_size: u64,

        /// Fixed workload-thread count.
        #[arg(long, default_value_t = 32)]
        workload_threads: u32,

        /// Size-thread counts to sweep.
        #[arg(long, value_delimiter = ',', default_values_t = [1u32, 2, 4])]
        size_threads: Vec<u32>,
    },

    /// Size-operation throughput across initial sizes, on a logarithmic axis.
    PerSize {
        #[command(flatten)]
        common: CommonArgs,

        /// Initial sizes to sweep.
        #[arg(long, value_delimiter = ',', default_values_t = [10_000u64, 100_000, 1_000_000])]
        init_sizes: Vec<u64>,

        /// Fixed workload-thread count.
        #[arg(long, default_value_t = 32)]
        workload_threads: u32,

        /// Fixed size-thread count.
        #[arg(long, default_value_t = 1)]
        size_threads: u32,

        /// Base of the logarithmic x axis.
        #[arg(long, default_value_t = 10.0)]
        log_base: f64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::OverheadBars {
            common,
            init_size,
            workload_threads,
            size_threads,
            split,
        } => {
            let config = common.config();
            let graph_name = if split { "overhead_split" } else { "overhead" };
            let benchmark_name = format!(
                "{init_size}setSize_{}_{size_threads}sizeThreads",
                common.ratio.file_fragment()
            );
            let united = runner::united_results_path(&config.results_dir, graph_name, &benchmark_name);
            if common.run {
                let trials =
                    runner::overhead_trials(&workload_threads, size_threads, init_size, split);
                execute(&config, &common.ratio, &trials, &united)?;
            }
            let results = aggregate_results_file(
                &united,
                &AggregateOptions {
                    warmup_repeats: common.warmup_repeats as usize,
                    metric: ThroughputMetric::WorkloadThreads,
                    split_by_op_type: split,
                },
            )?;
            let palette = StylePalette::default();
            fs::create_dir_all(&config.graphs_dir)?;
            let charts = render_overhead_bars(
                &results,
                &palette,
                &config.graphs_dir,
                graph_name,
                &benchmark_name,
                split,
            )?;
            info!(charts = charts.len(), "overhead bar charts complete");
        }

        Command::OverheadLines {
            common,
            init_size,
            workload_threads,
            size_threads,
        } => {
            let config = common.config();
            let graph_name = "overhead";
            let benchmark_name = format!(
                "{init_size}setSize_{}_{size_threads}sizeThreads",
                common.ratio.file_fragment()
            );
            let united = runner::united_results_path(&config.results_dir, graph_name, &benchmark_name);
            if common.run {
                let trials =
                    runner::overhead_trials(&workload_threads, size_threads, init_size, false);
                execute(&config, &common.ratio, &trials, &united)?;
            }
            let results = aggregate_results_file(
                &united,
                &AggregateOptions {
                    warmup_repeats: common.warmup_repeats as usize,
                    metric: ThroughputMetric::WorkloadThreads,
                    split_by_op_type: false,
                },
            )?;
            let palette = StylePalette::default();
            fs::create_dir_all(&config.graphs_dir)?;
            let charts = render_overhead_lines(
                &results,
                &palette,
                &config.graphs_dir,
                graph_name,
                &benchmark_name,
            )?;
            info!(charts = charts.len(), "overhead line charts complete");
        }

        Command::Scalability {
            common,
            init_size,
            workload_threads,
            size_threads,
        } => {
            let config = common.config();
            let benchmark_name = format!(
                "{init_size}setSize_{}_{workload_threads}workloadThreads",
                common.ratio.file_fragment()
            );
            let united =
                runner::united_results_path(&config.results_dir, "scalability", &benchmark_name);
            if common.run {
                let trials =
                    runner::scalability_trials(workload_threads, &size_threads, init_size);
                execute(&config, &common.ratio, &trials, &united)?;
            }
            let results = aggregate_results_file(
                &united,
                &AggregateOptions {
                    warmup_repeats: common.warmup_repeats as usize,
                    metric: ThroughputMetric::SizeThreads,
                    split_by_op_type: false,
                },
            )?;
            let palette = StylePalette::default();
            fs::create_dir_all(&config.graphs_dir)?;
            let chart =
                render_scalability(&results, &palette, &config.graphs_dir, &benchmark_name)?;
            info!(chart = %chart.display(), "scalability chart complete");
        }

        Command::PerSize {
            common,
            init_sizes,
            workload_threads,
            size_threads,
            log_base,
        } => {
            let config = common.config();
            let benchmark_name = format!(
                "{}_{workload_threads}workloadThreads_{size_threads}sizeThreads",
                common.ratio.file_fragment()
            );
            let united =
                runner::united_results_path(&config.results_dir, "per_size", &benchmark_name);
            if common.run {
                let trials =
                    runner::per_size_trials(workload_threads, size_threads, &init_sizes);
                execute(&config, &common.ratio, &trials, &united)?;
            }
            let results = aggregate_results_file(
                &united,
                &AggregateOptions {
                    warmup_repeats: common.warmup_repeats as usize,
                    metric: ThroughputMetric::SizeThreads,
                    split_by_op_type: false,
                },
            )?;
            let palette = StylePalette::default();
            fs::create_dir_all(&config.graphs_dir)?;
            for show_size_algorithms in [true, false] {
                let chart = render_per_size(
                    &results,
                    &palette,
                    &config.graphs_dir,
                    &benchmark_name,
                    PerSizeOptions {
                        show_size_algorithms,
                        x_log_base: log_base,
                    },
                )?;
                info!(chart = %chart.display(), "per-size chart complete");
            }
        }
    }
    Ok(())
}

/// Runs the trial plan and unites its output, replacing any stale trial files.
fn execute(
    config: &ExperimentConfig,
    ratio: &WorkloadRatio,
    trials: &[runner::Trial],
    united: &std::path::Path,
) -> Result<()> {
    runner::clean_build_dir(&config.build_dir)?;
    runner::run_trials(config, ratio, trials).context("driver measurements failed")?;
    runner::unite_results(&config.build_dir, united)
}
