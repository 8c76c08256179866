//! Configuration keys grouping repeated benchmark trials.
//!
//! Every trial row maps to a string-encoded key derived from the fields that
//! identify its configuration. Repeated runs of the same configuration share a
//! key and are aggregated together.

use std::fmt;

/// Marker substring identifying size-tracking algorithm variants.
const SIZE_PREFIX: &str = "Size";

/// Encodes the configuration key for a trial row, e.g.
/// `SizeBST-8w-1s-10000k-3i-2d-95size`.
pub fn config_key(
    algorithm: &str,
    workload_threads: u32,
    size_threads: u32,
    init_size: u64,
    percentage_ratio: &str,
) -> String {
    format!("{algorithm}-{workload_threads}w-{size_threads}s-{init_size}k-{percentage_ratio}")
}

/// Encodes the per-operation-type key used in split mode by extending the
/// plain configuration key with an `r-<op>` suffix.
pub fn split_config_key(
    algorithm: &str,
    workload_threads: u32,
    size_threads: u32,
    init_size: u64,
    percentage_ratio: &str,
    op_type: OpType,
) -> String {
    let base = config_key(
        algorithm,
        workload_threads,
        size_threads,
        init_size,
        percentage_ratio,
    );
    format!("{base}r-{op_type}")
}

/// Whether the algorithm name denotes a size-tracking variant.
pub fn is_size_tracking(algorithm: &str) -> bool {
    algorithm.contains(SIZE_PREFIX)
}

/// The non-tracking baseline for a size-tracking variant (`SizeBST` -> `BST`).
/// Returns `None` for algorithms without the size-tracking prefix.
pub fn baseline_name(algorithm: &str) -> Option<&str> {
    algorithm.strip_prefix(SIZE_PREFIX)
}

/// Operation types a workload thread performs against the benchmarked
/// structure, plus the synthetic `All` bucket summing the three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpType {
    All,
    Insert,
    Delete,
    Contains,
}

impl OpType {
    /// Variants in their fixed reporting order.
    pub const ALL: [OpType; 4] = [OpType::All, OpType::Insert, OpType::Delete, OpType::Contains];

    pub fn label(&self) -> &'static str {
        match self {
            OpType::All => "all",
            OpType::Insert => "insert",
            OpType::Delete => "delete",
            OpType::Contains => "contains",
        }
    }
}

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Horizontal offset of the `position`-th bar in a group of `count` bars of
/// the given width, centered around the group's x coordinate.
pub fn bar_offset(position: usize, count: usize, width: f64) -> f64 {
    (position as f64 - (count as f64 - 1.0) / 2.0) * width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_key_format() {
        let key = config_key("SizeBST", 8, 1, 10_000, "3i-2d-95size");
        assert_eq!(key, "SizeBST-8w-1s-10000k-3i-2d-95size");
    }

    #[test]
    fn split_key_extends_plain_key() {
        let key = split_config_key("BST", 4, 0, 1000, "30i-20d-50size", OpType::Insert);
        assert_eq!(key, "BST-4w-0s-1000k-30i-20d-50sizer-insert");
    }

    #[test]
    fn baseline_is_prefix_stripped() {
        assert_eq!(baseline_name("SizeHashTable"), Some("HashTable"));
        assert_eq!(baseline_name("HashTable"), None);
        assert!(is_size_tracking("SizeSkipList"));
        assert!(!is_size_tracking("IteratorSkipList"));
    }

    #[test]
    fn bar_offsets_are_symmetric() {
        let offsets: Vec<f64> = (0..4).map(|i| bar_offset(i, 4, 0.2)).collect();
        let expected = [-0.3, -0.1, 0.1, 0.3];
        for (got, want) in offsets.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
    }
}
