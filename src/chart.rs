//! Static bitrate charts.
//!
//! Renders the series as an SVG line chart with `plotters`: time on the x
//! axis, kbps on the y axis, and an optional horizontal target marker.
//!
//! # Example
//!
//! ```no_run
//! use bitrate_viz::{ChartOptions, Sample, aggregate, chart};
//!
//! let series = aggregate(&[Sample::new(0.2, 1_000)], 1.0)?;
//! let options = ChartOptions::new("input.mp4").with_target_bitrate(Some(8.0));
//! chart::save_svg(&series, &options, "bitrate.svg")?;
//! # Ok::<(), bitrate_viz::BitrateError>(())
//! ```

use std::fmt::Display;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::aggregate::BitrateSeries;
use crate::configuration::ChartOptions;
use crate::error::BitrateError;

const LINE_COLOR: RGBColor = RGBColor(31, 119, 180);
const TARGET_COLOR: RGBColor = RGBColor(214, 39, 40);
const GRID_COLOR: RGBColor = RGBColor(176, 176, 176);

/// Rough number of grid lines per axis.
const GRID_LINES: usize = 10;

/// Render the chart into an SVG document held in memory.
pub fn render_svg(series: &BitrateSeries, options: &ChartOptions) -> Result<String, BitrateError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        draw(root, series, options)?;
    }
    Ok(svg)
}

/// Render the chart and write it to `path` as SVG.
pub fn save_svg<P: AsRef<Path>>(
    series: &BitrateSeries,
    options: &ChartOptions,
    path: P,
) -> Result<(), BitrateError> {
    let path = path.as_ref();
    log::debug!("Rendering chart to {}", path.display());
    let root = SVGBackend::new(path, (options.width, options.height)).into_drawing_area();
    draw(root, series, options)
}

fn draw<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    series: &BitrateSeries,
    options: &ChartOptions,
) -> Result<(), BitrateError> {
    root.fill(&WHITE).map_err(chart_error)?;

    let (x_max, y_max) = axis_bounds(series, options.target_bitrate_kbps);

    let mut chart = ChartBuilder::on(&root)
        .caption(options.title(), ("sans-serif", 20))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(64)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Time (s)")
        .y_desc("Bitrate (kbps)")
        .draw()
        .map_err(chart_error)?;

    // plotters' mesh lines are always solid, so the dashed grid is drawn by hand.
    let grid_style = GRID_COLOR.stroke_width(1);
    for x in grid_positions(x_max, GRID_LINES) {
        chart
            .draw_series(DashedLineSeries::new(
                vec![(x, 0.0), (x, y_max)],
                4_u32,
                4_u32,
                grid_style,
            ))
            .map_err(chart_error)?;
    }
    for y in grid_positions(y_max, GRID_LINES) {
        chart
            .draw_series(DashedLineSeries::new(
                vec![(0.0, y), (x_max, y)],
                4_u32,
                4_u32,
                grid_style,
            ))
            .map_err(chart_error)?;
    }

    chart
        .draw_series(LineSeries::new(
            series.points().iter().map(|point| (point.time_sec, point.rate_kbps)),
            &LINE_COLOR,
        ))
        .map_err(chart_error)?
        .label("bitrate")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &LINE_COLOR));

    if let Some(target) = options.target_bitrate_kbps {
        chart
            .draw_series(LineSeries::new(
                vec![(0.0, target), (x_max, target)],
                TARGET_COLOR.stroke_width(2),
            ))
            .map_err(chart_error)?
            .label(format!("target {target} kbps"))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &TARGET_COLOR));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    Ok(())
}

/// Upper bounds for both axes.
///
/// The x axis ends at the last bucket's far edge; the y axis leaves 10%
/// headroom above the highest rate or target. Both are at least 1 so an
/// empty series still gets a drawable plot area.
pub(crate) fn axis_bounds(series: &BitrateSeries, target_kbps: Option<f64>) -> (f64, f64) {
    let x_max = series
        .points()
        .last()
        .map(|point| point.time_sec + series.window_sec() / 2.0)
        .unwrap_or(0.0)
        .max(1.0);

    let peak = series
        .rates()
        .chain(target_kbps)
        .fold(0.0_f64, f64::max);
    let y_max = (peak * 1.1).max(1.0);

    (x_max, y_max)
}

/// Grid positions strictly inside `(0, max)` on a 1-2-5 step, aiming for
/// about `lines` lines.
pub(crate) fn grid_positions(max: f64, lines: usize) -> Vec<f64> {
    if lines == 0 || !max.is_finite() || max <= 0.0 {
        return Vec::new();
    }

    let raw_step = max / lines as f64;
    let magnitude = 10_f64.powf(raw_step.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|multiple| multiple * magnitude)
        .find(|step| *step >= raw_step)
        .unwrap_or(10.0 * magnitude);

    (1_u32..)
        .map(|i| f64::from(i) * step)
        .take_while(|position| *position < max)
        .collect()
}

fn chart_error<E: Display>(error: E) -> BitrateError {
    BitrateError::ChartError(error.to_string())
}
