//! Standalone legend images, exported separately from the charts they
//! describe so figures can share a single legend in print layouts.

use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;

use super::style::{MarkerKind, Rgb, SeriesStyle};

const ROW_HEIGHT: i32 = 40;
const LINE_LEN: i32 = 36;
const FONT: (&str, u32) = ("sans-serif", 18);

fn entry_width(label: &str) -> i32 {
    LINE_LEN + 18 + 10 * label.len() as i32
}

/// Exports a horizontal legend of line series: a styled line segment with its
/// marker, followed by the display label.
pub fn export_series_legend(path: &Path, entries: &[(&str, &SeriesStyle)]) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    let width: i32 = entries.iter().map(|(label, _)| entry_width(label)).sum();
    let root = SVGBackend::new(path, (width as u32 + 16, ROW_HEIGHT as u32)).into_drawing_area();
    root.fill(&WHITE)?;

    let y = ROW_HEIGHT / 2;
    let mut x = 8;
    for (label, series_style) in entries {
        let color = series_style.color.color();
        root.draw(&PathElement::new(
            vec![(x, y), (x + LINE_LEN, y)],
            color.stroke_width(3),
        ))?;
        let center = (x + LINE_LEN / 2, y);
        match series_style.marker {
            MarkerKind::None => {}
            MarkerKind::Cross => root.draw(&Cross::new(center, 6, color.stroke_width(2)))?,
            MarkerKind::Circle => root.draw(&Circle::new(center, 5, color.stroke_width(2)))?,
            MarkerKind::FilledCircle => root.draw(&Circle::new(center, 5, color.filled()))?,
            MarkerKind::Triangle => root.draw(&TriangleMarker::new(center, 6, color.filled()))?,
        }
        root.draw(&Text::new(
            (*label).to_string(),
            (x + LINE_LEN + 10, y - 9),
            FONT,
        ))?;
        x += entry_width(label);
    }

    root.present()?;
    Ok(())
}

/// Exports a horizontal legend of color swatches, used for the split-mode
/// operation-type bars.
pub fn export_swatch_legend(path: &Path, entries: &[(&str, Rgb)]) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    let width: i32 = entries.iter().map(|(label, _)| entry_width(label)).sum();
    let root = SVGBackend::new(path, (width as u32 + 16, ROW_HEIGHT as u32)).into_drawing_area();
    root.fill(&WHITE)?;

    let y = ROW_HEIGHT / 2;
    let mut x = 8;
    for (label, color) in entries {
        root.draw(&Rectangle::new(
            [(x, y - 8), (x + 24, y + 8)],
            color.color().filled(),
        ))?;
        root.draw(&Text::new(
            (*label).to_string(),
            (x + 34, y - 9),
            FONT,
        ))?;
        x += entry_width(label);
    }

    root.present()?;
    Ok(())
}
