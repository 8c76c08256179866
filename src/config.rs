use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Settings shared by every experiment invocation: where the Java driver
/// lives, how it is sized, and where its inputs and outputs go.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperimentConfig {
    /// Java executable used to launch the benchmark driver.
    pub java: String,
    /// Path to the benchmark driver jar.
    pub jar: PathBuf,
    /// JVM heap size passed as both `-Xms` and `-Xmx` (e.g. `8G`).
    pub jvm_heap: String,
    /// Per-trial runtime in seconds.
    pub runtime_secs: f64,
    /// Leading repetitions excluded from statistics.
    pub warmup_repeats: u32,
    /// Measured repetitions per configuration.
    pub measured_repeats: u32,
    /// Scratch directory for per-trial CSV output.
    pub build_dir: PathBuf,
    /// Directory holding united results files.
    pub results_dir: PathBuf,
    /// Directory chart images are written to.
    pub graphs_dir: PathBuf,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            java: "java".into(),
            jar: PathBuf::from("build/experiments_instr.jar"),
            jvm_heap: "8G".into(),
            runtime_secs: 5.0,
            warmup_repeats: 1,
            measured_repeats: 5,
            build_dir: PathBuf::from("build"),
            results_dir: PathBuf::from("results"),
            graphs_dir: PathBuf::from("graphs"),
        }
    }
}

impl ExperimentConfig {
    pub fn with_jar(mut self, jar: impl Into<PathBuf>) -> Self {
        self.jar = jar.into();
        self
    }

    pub fn with_jvm_heap(mut self, heap: impl Into<String>) -> Self {
        self.jvm_heap = heap.into();
        self
    }

    pub fn with_repeats(mut self, warmup: u32, measured: u32) -> Self {
        self.warmup_repeats = warmup;
        self.measured_repeats = measured;
        self
    }

    /// Repetitions requested from the driver, warm-up included.
    pub fn total_repeats(&self) -> u32 {
        self.warmup_repeats + self.measured_repeats
    }
}

/// Insert/delete percentages of the workload mix; the remainder are contains
/// operations. Parses from the `<ins>-<del>` form used on the command line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkloadRatio {
    insert: u8,
    delete: u8,
}

impl WorkloadRatio {
    pub fn new(insert: u8, delete: u8) -> Result<Self, String> {
        if insert as u16 + delete as u16 > 100 {
            return Err(format!(
                "insert + delete percentages must not exceed 100, got {insert}+{delete}"
            ));
        }
        Ok(Self { insert, delete })
    }

    pub fn insert(&self) -> u8 {
        self.insert
    }

    pub fn delete(&self) -> u8 {
        self.delete
    }

    pub fn contains(&self) -> u8 {
        100 - self.insert - self.delete
    }

    /// The `<i>ins-<d>rem` fragment used in results and chart file names.
    pub fn file_fragment(&self) -> String {
        format!("{}ins-{}rem", self.insert, self.delete)
    }
}

impl fmt::Display for WorkloadRatio {
    /// The percentage-ratio label the driver reports in its CSV rows.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}i-{}d-{}size",
            self.insert,
            self.delete,
            self.contains()
        )
    }
}

impl FromStr for WorkloadRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (insert, delete) = s
            .split_once('-')
            .ok_or_else(|| format!("expected <ins>-<del>, got {s:?}"))?;
        let insert = insert
            .parse()
            .map_err(|_| format!("invalid insert percentage {insert:?}"))?;
        let delete = delete
            .parse()
            .map_err(|_| format!("invalid delete percentage {delete:?}"))?;
        Self::new(insert, delete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_parses_and_labels() {
        let ratio: WorkloadRatio = "3-2".parse().unwrap();
        assert_eq!(ratio.insert(), 3);
        assert_eq!(ratio.delete(), 2);
        assert_eq!(ratio.contains(), 95);
        assert_eq!(ratio.to_string(), "3i-2d-95size");
        assert_eq!(ratio.file_fragment(), "3ins-2rem");
    }

    #[test]
    fn ratio_rejects_oversubscribed_mix() {
        assert!("60-50".parse::<WorkloadRatio>().is_err());
        assert!("x-2".parse::<WorkloadRatio>().is_err());
        assert!("50".parse::<WorkloadRatio>().is_err());
    }

    #[test]
    fn total_repeats_include_warmup() {
        let config = ExperimentConfig::default().with_repeats(2, 7);
        assert_eq!(config.total_repeats(), 9);
    }
}
