pub mod aggregate;
pub mod key;
pub mod reader;
pub mod stats;

pub use self::aggregate::{
    aggregate_results_file, AggregateOptions, AggregatedResults, ThroughputMetric,
};
pub use self::key::OpType;
pub use self::reader::{Dimensions, RawResults, ResultRow, ResultsError};
pub use self::stats::Aggregate;
