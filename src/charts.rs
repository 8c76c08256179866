//! Chart renderers consuming the aggregated throughput maps.
//!
//! Dimensions expected to be constant across a scan are enforced with fatal
//! errors, as is the presence of baseline keys for overhead comparisons: a
//! violated expectation means the experiment run was incomplete, and the whole
//! render aborts rather than silently skipping a series.

pub mod legend;
pub mod overhead;
pub mod per_size;
pub mod scalability;
pub mod style;

use std::collections::BTreeMap;
use std::fmt::Debug;

use anyhow::{ensure, Context, Result};
use plotters::chart::ChartContext;
use plotters::coord::CoordTranslate;
use plotters::prelude::*;
use plotters::series::{DashedLineSeries, LineSeries};

use self::style::{LineKind, MarkerKind, SeriesStyle};

pub use self::style::StylePalette;

pub(crate) const CHART_SIZE: (u32, u32) = (900, 540);
pub(crate) const TICK_FONT: (&str, u32) = ("sans-serif", 18);
pub(crate) const AXIS_FONT: (&str, u32) = ("sans-serif", 22);

/// Fallback color for algorithms the palette does not know.
pub(crate) const FALLBACK_COLOR: style::Rgb = style::Rgb(127, 127, 127);

/// Asserts that a dimension expected to be fixed across the scan holds
/// exactly one distinct value.
pub(crate) fn sole<'a, T: Debug>(values: &'a [T], dimension: &str) -> Result<&'a T> {
    ensure!(
        values.len() == 1,
        "expected exactly one {dimension} in the results file, found {values:?}"
    );
    Ok(&values[0])
}

/// Axis span over observed values. A lone value would produce an empty range,
/// which plotters cannot map to pixels, so it is widened around the point.
pub(crate) fn padded_span(min: f64, max: f64) -> (f64, f64) {
    if min < max {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    }
}

/// Looks up a configuration that must be present; a missing key indicates an
/// incomplete experiment run and is fatal.
pub(crate) fn required(map: &BTreeMap<String, f64>, key: &str) -> Result<f64> {
    map.get(key)
        .copied()
        .with_context(|| format!("configuration {key} missing from aggregated results"))
}

/// Draws one throughput series as a styled line with its markers. Works for
/// both linear and logarithmic coordinate systems.
pub(crate) fn draw_line<CT>(
    chart: &mut ChartContext<'_, SVGBackend<'_>, CT>,
    points: &[(f64, f64)],
    series_style: &SeriesStyle,
) -> Result<()>
where
    CT: CoordTranslate<From = (f64, f64)>,
{
    let color = series_style.color.color();
    match series_style.line {
        LineKind::Solid => {
            chart.draw_series(LineSeries::new(points.to_vec(), color.stroke_width(3)))?;
        }
        LineKind::Dashed => {
            chart.draw_series(DashedLineSeries::new(
                points.to_vec(),
                10,
                6,
                color.stroke_width(3),
            ))?;
        }
        LineKind::Dotted => {
            chart.draw_series(DashedLineSeries::new(
                points.to_vec(),
                2,
                5,
                color.stroke_width(3),
            ))?;
        }
    }

    match series_style.marker {
        MarkerKind::None => {}
        MarkerKind::Cross => {
            chart.draw_series(
                points
                    .iter()
                    .map(|&point| Cross::new(point, 6, color.stroke_width(2))),
            )?;
        }
        MarkerKind::Circle => {
            chart.draw_series(
                points
                    .iter()
                    .map(|&point| Circle::new(point, 5, color.stroke_width(2))),
            )?;
        }
        MarkerKind::FilledCircle => {
            chart.draw_series(points.iter().map(|&point| Circle::new(point, 5, color.filled())))?;
        }
        MarkerKind::Triangle => {
            chart.draw_series(
                points
                    .iter()
                    .map(|&point| TriangleMarker::new(point, 6, color.filled())),
            )?;
        }
    }

    Ok(())
}
