//! Aggregate statistics over the repeated trials of one configuration.

/// Sentinel reported when a mean or coefficient of variation is undefined.
pub const SENTINEL: f64 = -1.0;

/// Means below this threshold are treated as numerically negligible; their
/// coefficient of variation is reported as [`SENTINEL`] instead of dividing
/// by a near-zero value.
pub const NEGLIGIBLE_MEAN: f64 = 1e-8;

/// Summary statistics for one configuration key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    /// Number of samples the statistics were computed over, after the warm-up
    /// prefix was discarded.
    pub samples: usize,
    pub mean: f64,
    /// Population standard deviation.
    pub stddev: f64,
    /// Coefficient of variation, stddev / mean.
    pub cv: f64,
}

/// Computes mean, population standard deviation, and coefficient of variation
/// over the given samples. An empty slice yields the sentinel mean.
pub fn summarize(samples: &[f64]) -> Aggregate {
    if samples.is_empty() {
        return Aggregate {
            samples: 0,
            mean: SENTINEL,
            stddev: 0.0,
            cv: SENTINEL,
        };
    }

    let count = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / count;
    let variance = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / count;
    let stddev = variance.sqrt();
    let cv = if mean < NEGLIGIBLE_MEAN {
        SENTINEL
    } else {
        stddev / mean
    };

    Aggregate {
        samples: samples.len(),
        mean,
        stddev,
        cv,
    }
}
