//! Java driver orchestration.
//!
//! Builds the command line for each measurement trial, runs the driver,
//! and concatenates the per-trial CSVs into one united results file that
//! the aggregation pipeline consumes.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use crate::config::{ExperimentConfig, WorkloadRatio};
use crate::results::key;

/// Driver names for the overhead experiments: each size-tracking structure
/// next to its plain baseline.
pub const OVERHEAD_STRUCTURES: [&str; 6] = [
    "BST",
    "SizeBST",
    "SkipList",
    "SizeSkipList",
    "HashTable",
    "SizeHashTable",
];

/// Driver names for the scalability and per-size experiments. Entries may
/// carry extra driver arguments after the structure name.
pub const SCALABILITY_STRUCTURES: [&str; 5] = [
    "SizeBST",
    "SizeSkipList",
    "SizeHashTable",
    "IteratorSkipList",
    "VcasBatchBSTGC -param-64",
];

/// One driver invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trial {
    pub structure: String,
    pub workload_threads: u32,
    pub size_threads: u32,
    pub init_size: u64,
    pub split: bool,
}

/// Trials for an overhead scan: every structure at every workload-thread
/// count. Plain structures always run with zero size threads.
pub fn overhead_trials(
    workload_threads: &[u32],
    size_threads: u32,
    init_size: u64,
    split: bool,
) -> Vec<Trial> {
    let mut trials = Vec::new();
    for structure in OVERHEAD_STRUCTURES {
        let size_threads = if key::is_size_tracking(structure) {
            size_threads
        } else {
            0
        };
        for &threads in workload_threads {
            trials.push(Trial {
                structure: structure.to_string(),
                workload_threads: threads,
                size_threads,
                init_size,
                split,
            });
        }
    }
    trials
}

/// Trials for a scalability scan: every structure at every size-thread count.
pub fn scalability_trials(
    workload_threads: u32,
    size_threads: &[u32],
    init_size: u64,
) -> Vec<Trial> {
    let mut trials = Vec::new();
    for structure in SCALABILITY_STRUCTURES {
        for &threads in size_threads {
            trials.push(Trial {
                structure: structure.to_string(),
                workload_threads,
                size_threads: threads,
                init_size,
                split: false,
            });
        }
    }
    trials
}

/// Trials for a per-size scan: every structure at every initial size.
pub fn per_size_trials(
    workload_threads: u32,
    size_threads: u32,
    init_sizes: &[u64],
) -> Vec<Trial> {
    let mut trials = Vec::new();
    for structure in SCALABILITY_STRUCTURES {
        for &init_size in init_sizes {
            trials.push(Trial {
                structure: structure.to_string(),
                workload_threads,
                size_threads,
                init_size,
                split: false,
            });
        }
    }
    trials
}

/// Arguments for one driver invocation, without the `java` program itself.
/// Pure so command construction is testable without a JVM.
pub fn driver_args(
    config: &ExperimentConfig,
    ratio: &WorkloadRatio,
    trial: &Trial,
    trial_file: &Path,
) -> Vec<String> {
    let mut args = vec![
        "-server".to_string(),
        format!("-Xms{}", config.jvm_heap),
        format!("-Xmx{}", config.jvm_heap),
        "-jar".to_string(),
        config.jar.display().to_string(),
        trial.workload_threads.to_string(),
        trial.size_threads.to_string(),
        config.total_repeats().to_string(),
        config.runtime_secs.to_string(),
    ];
    // Structure entries may carry extra driver arguments after the name.
    args.extend(trial.structure.split_whitespace().map(String::from));
    args.push(format!("-ins{}", ratio.insert()));
    args.push(format!("-del{}", ratio.delete()));
    args.push(format!("-initSize{}", trial.init_size));
    args.push("-prefill".to_string());
    if trial.split {
        args.push("-split".to_string());
    }
    args.push(format!("-file-{}", trial_file.display()));
    args
}

/// Path of the per-trial CSV inside the build directory. Trial numbering is
/// one-based.
pub fn trial_file(build_dir: &Path, trial_number: usize) -> PathBuf {
    build_dir.join(format!("data-trials{trial_number}.csv"))
}

/// Path of the united results file for a named experiment.
pub fn united_results_path(
    results_dir: &Path,
    graph_name: &str,
    benchmark_name: &str,
) -> PathBuf {
    results_dir.join(format!("{graph_name}_{benchmark_name}.csv"))
}

/// Removes stale per-trial output from the build directory.
pub fn clean_build_dir(build_dir: &Path) -> Result<()> {
    if !build_dir.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(build_dir)
        .with_context(|| format!("reading build directory {}", build_dir.display()))?
    {
        let path = entry?.path();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if name.ends_with(".csv") || name.ends_with(".csv_stdout") {
            fs::remove_file(&path)
                .with_context(|| format!("removing stale trial file {}", path.display()))?;
        }
    }
    Ok(())
}

/// Runs every trial in order, aborting on the first driver failure.
pub fn run_trials(
    config: &ExperimentConfig,
    ratio: &WorkloadRatio,
    trials: &[Trial],
) -> Result<()> {
    fs::create_dir_all(&config.build_dir)
        .with_context(|| format!("creating build directory {}", config.build_dir.display()))?;
    for (index, trial) in trials.iter().enumerate() {
        let out = trial_file(&config.build_dir, index + 1);
        let args = driver_args(config, ratio, trial, &out);
        info!(
            structure = %trial.structure,
            workload_threads = trial.workload_threads,
            size_threads = trial.size_threads,
            init_size = trial.init_size,
            "running driver trial"
        );
        debug!(command = %args.join(" "), "driver command line");
        let status = Command::new(&config.java)
            .args(&args)
            .status()
            .with_context(|| format!("launching {}", config.java))?;
        if !status.success() {
            bail!(
                "driver exited with {status} for structure {} ({} workload threads)",
                trial.structure,
                trial.workload_threads
            );
        }
    }
    Ok(())
}

/// Concatenates all per-trial CSVs into the united results file, creating its
/// parent directory. Files are appended in name order.
pub fn unite_results(build_dir: &Path, united_path: &Path) -> Result<()> {
    if let Some(parent) = united_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating results directory {}", parent.display()))?;
    }
    let mut parts: Vec<PathBuf> = fs::read_dir(build_dir)
        .with_context(|| format!("reading build directory {}", build_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("data-") && n.ends_with(".csv"))
        })
        .collect();
    parts.sort();

    let mut united = File::create(united_path)
        .with_context(|| format!("creating united results file {}", united_path.display()))?;
    for part in &parts {
        let mut input = File::open(part)
            .with_context(|| format!("opening trial file {}", part.display()))?;
        io::copy(&mut input, &mut united)
            .with_context(|| format!("appending {}", part.display()))?;
    }
    united.flush()?;
    info!(
        trials = parts.len(),
        united = %united_path.display(),
        "united trial results"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExperimentConfig;

    fn test_ratio() -> WorkloadRatio {
        WorkloadRatio::new(3, 2).unwrap()
    }

    #[test]
    fn driver_args_match_expected_shape() {
        let config = ExperimentConfig::default()
            .with_jvm_heap("8G")
            .with_repeats(1, 5);
        let trial = Trial {
            structure: "SizeBST".to_string(),
            workload_threads: 32,
            size_threads: 1,
            init_size: 10_000,
            split: false,
        };
        let args = driver_args(&config, &test_ratio(), &trial, Path::new("build/data-trials1.csv"));
        assert_eq!(
            args,
            vec![
                "-server",
                "-Xms8G",
                "-Xmx8G",
                "-jar",
                "build/experiments_instr.jar",
                "32",
                "1",
                "6",
                "5",
                "SizeBST",
                "-ins3",
                "-del2",
                "-initSize10000",
                "-prefill",
                "-file-build/data-trials1.csv",
            ]
        );
    }

    #[test]
    fn split_flag_precedes_file_argument() {
        let config = ExperimentConfig::default();
        let trial = Trial {
            structure: "HashTable".to_string(),
            workload_threads: 8,
            size_threads: 0,
            init_size: 1_000,
            split: true,
        };
        let args = driver_args(&config, &test_ratio(), &trial, Path::new("out.csv"));
        let split_pos = args.iter().position(|a| a == "-split").unwrap();
        assert_eq!(args[split_pos + 1], "-file-out.csv");
    }

    #[test]
    fn structure_extra_arguments_are_split() {
        let config = ExperimentConfig::default();
        let trial = Trial {
            structure: "VcasBatchBSTGC -param-64".to_string(),
            workload_threads: 4,
            size_threads: 2,
            init_size: 100,
            split: false,
        };
        let args = driver_args(&config, &test_ratio(), &trial, Path::new("out.csv"));
        let pos = args.iter().position(|a| a == "VcasBatchBSTGC").unwrap();
        assert_eq!(args[pos + 1], "-param-64");
    }

    #[test]
    fn overhead_plain_structures_run_without_size_threads() {
        let trials = overhead_trials(&[1, 4], 2, 10_000, false);
        assert_eq!(trials.len(), 12);
        for trial in &trials {
            if key::is_size_tracking(&trial.structure) {
                assert_eq!(trial.size_threads, 2);
            } else {
                assert_eq!(trial.size_threads, 0);
            }
        }
    }

    #[test]
    fn scalability_trials_cover_every_thread_count() {
        let trials = scalability_trials(32, &[1, 2, 4], 10_000);
        assert_eq!(trials.len(), SCALABILITY_STRUCTURES.len() * 3);
        assert!(trials.iter().all(|t| t.workload_threads == 32));
    }

    #[test]
    fn trial_files_are_one_based() {
        assert_eq!(
            trial_file(Path::new("build"), 3),
            PathBuf::from("build/data-trials3.csv")
        );
    }
}
