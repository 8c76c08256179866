//! Results-processing and graphing harness for concurrent-set size benchmarks.
//!
//! The modules exposed here define the pipeline boundaries: `runner` invokes
//! the external Java benchmark driver and unites its per-trial CSV output,
//! `results` parses the united file and aggregates per-configuration
//! throughput statistics, and `charts` renders the comparison graphs from the
//! aggregated values.

pub mod charts;
pub mod config;
pub mod results;
pub mod runner;

pub use crate::charts::style::{LineKind, MarkerKind, Rgb, SeriesStyle, StylePalette};
pub use crate::config::{ExperimentConfig, WorkloadRatio};
pub use crate::results::aggregate::{
    aggregate_results_file, AggregateOptions, AggregatedResults, ThroughputMetric,
};
pub use crate::results::key::OpType;
pub use crate::results::reader::{Dimensions, ResultRow, ResultsError};
