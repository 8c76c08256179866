//! Display descriptors for chart series.
//!
//! Renderers never consult process-wide styling state; the palette is built
//! once and injected into each renderer call. The default palette covers the
//! algorithm families of the original experiments, and an alternative palette
//! can be deserialized from configuration.

use std::collections::BTreeMap;

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

use crate::results::key::OpType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub(crate) fn color(self) -> RGBColor {
        RGBColor(self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerKind {
    None,
    Cross,
    Circle,
    FilledCircle,
    Triangle,
}

/// How one algorithm's series is drawn and labelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    /// Display name shown in legends (may differ from the raw algorithm name).
    pub label: String,
    pub color: Rgb,
    pub line: LineKind,
    pub marker: MarkerKind,
}

impl SeriesStyle {
    pub fn new(label: impl Into<String>, color: Rgb, line: LineKind, marker: MarkerKind) -> Self {
        Self {
            label: label.into(),
            color,
            line,
            marker,
        }
    }
}

/// Algorithm identifier -> display descriptor mapping, plus the fixed legend
/// ordering and the per-operation-type colors used by split overhead bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StylePalette {
    styles: BTreeMap<String, SeriesStyle>,
    legend_order: Vec<String>,
    split_colors: [Rgb; 4],
}

// The default colors follow the matplotlib tab10 cycle the original
// experiment figures used.
const C0: Rgb = Rgb(31, 119, 180);
const C1: Rgb = Rgb(255, 127, 14);
const C2: Rgb = Rgb(44, 160, 44);
const C3: Rgb = Rgb(214, 39, 40);
const C4: Rgb = Rgb(148, 103, 189);
const C5: Rgb = Rgb(140, 86, 75);
const C6: Rgb = Rgb(227, 119, 194);
const C7: Rgb = Rgb(127, 127, 127);
const C9: Rgb = Rgb(23, 190, 207);
const PINK: Rgb = Rgb(255, 192, 203);

impl Default for StylePalette {
    fn default() -> Self {
        let mut palette = Self {
            styles: BTreeMap::new(),
            legend_order: [
                "HashTable",
                "SizeHashTable",
                "BST",
                "SizeBST",
                "SkipList",
                "SizeSkipList",
                "VcasBatchBSTGC64",
                "IteratorSkipList",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            split_colors: [C9, C7, PINK, C4],
        };

        palette.insert("BST", SeriesStyle::new("BST", C3, LineKind::Dashed, MarkerKind::Cross));
        palette.insert(
            "SizeBST",
            SeriesStyle::new("SizeBST", C1, LineKind::Solid, MarkerKind::Triangle),
        );
        palette.insert(
            "SkipList",
            SeriesStyle::new("SkipList", C0, LineKind::Dashed, MarkerKind::Cross),
        );
        palette.insert(
            "SizeSkipList",
            SeriesStyle::new("SizeSkipList", C2, LineKind::Solid, MarkerKind::FilledCircle),
        );
        palette.insert(
            "HashTable",
            SeriesStyle::new("HashTable", C4, LineKind::Dashed, MarkerKind::Circle),
        );
        palette.insert(
            "SizeHashTable",
            SeriesStyle::new("SizeHashTable", C6, LineKind::Solid, MarkerKind::FilledCircle),
        );
        palette.insert(
            "IteratorSkipList",
            SeriesStyle::new("SnapshotSkipList", C9, LineKind::Dotted, MarkerKind::Circle),
        );
        palette.insert(
            "VcasBatchBSTGC64",
            SeriesStyle::new("VcasBST-64", C5, LineKind::Dotted, MarkerKind::Triangle),
        );
        palette
    }
}

impl StylePalette {
    pub fn insert(&mut self, algorithm: impl Into<String>, style: SeriesStyle) {
        self.styles.insert(algorithm.into(), style);
    }

    pub fn with_style(mut self, algorithm: impl Into<String>, style: SeriesStyle) -> Self {
        self.insert(algorithm, style);
        self
    }

    pub fn style(&self, algorithm: &str) -> Option<&SeriesStyle> {
        self.styles.get(algorithm)
    }

    /// Display label for an algorithm; unknown algorithms fall back to their
    /// raw name.
    pub fn label<'a>(&'a self, algorithm: &'a str) -> &'a str {
        self.style(algorithm)
            .map(|style| style.label.as_str())
            .unwrap_or(algorithm)
    }

    /// Fixed ordering used when several algorithms share a chart or legend.
    pub fn legend_order(&self) -> &[String] {
        &self.legend_order
    }

    pub fn split_color(&self, op_type: OpType) -> Rgb {
        let position = OpType::ALL
            .iter()
            .position(|op| *op == op_type)
            .unwrap_or(0);
        self.split_colors[position]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_palette_covers_families() {
        let palette = StylePalette::default();
        for algorithm in palette.legend_order().to_vec() {
            assert!(palette.style(&algorithm).is_some(), "missing style for {algorithm}");
        }
    }

    #[test]
    fn display_names_override_raw_names() {
        let palette = StylePalette::default();
        assert_eq!(palette.label("VcasBatchBSTGC64"), "VcasBST-64");
        assert_eq!(palette.label("IteratorSkipList"), "SnapshotSkipList");
        assert_eq!(palette.label("UnknownAlg"), "UnknownAlg");
    }

    #[test]
    fn split_colors_follow_op_type_order() {
        let palette = StylePalette::default();
        assert_eq!(palette.split_color(OpType::All), C9);
        assert_eq!(palette.split_color(OpType::Contains), C4);
    }
}
