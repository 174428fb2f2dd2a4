//! Line chart rendering with plotters
//!
//! One chart per `ChartSpec`: a line per series on shared axes, linear or log
//! scale on either axis, title, axis labels, legend and grid, written as PNG.

mod backend;

pub use backend::FontSafeBackend;

use crate::config::{AxisScale, ChartSpec, LegendPosition};
use crate::error::{PerfPlotError, Result};
use crate::palette::PaletteDefinition;
use crate::series::ChartSeries;
use plotters::coord::ranged1d::{AsRangedCoord, ValueFormatter};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;

/// Log axes extend this factor past the data on both ends
const LOG_PADDING: f64 = 1.25;

/// Linear axes extend this fraction of the span past the data
const LINEAR_PADDING: f64 = 0.05;

const LINE_WIDTH: u32 = 2;

/// Renders charts with a fixed size, palette and legend placement
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    width: u32,
    height: u32,
    palette: PaletteDefinition,
    legend_position: LegendPosition,
    /// Every list type in the dataset; a list type's colour is its position here
    color_order: Vec<String>,
}

impl ChartRenderer {
    pub fn new(
        width: u32,
        height: u32,
        palette: PaletteDefinition,
        legend_position: LegendPosition,
        color_order: Vec<String>,
    ) -> Self {
        Self {
            width,
            height,
            palette,
            legend_position,
            color_order,
        }
    }

    /// Colour for a list type, stable across charts
    pub fn color_for(&self, list_type: &str, fallback_index: usize) -> RGBColor {
        let index = self
            .color_order
            .iter()
            .position(|name| name == list_type)
            .unwrap_or(fallback_index);
        let [r, g, b] = self.palette.get_color(index);
        RGBColor(r, g, b)
    }

    /// Draw `series` according to `spec` and write the PNG
    pub fn render(&self, spec: &ChartSpec, series: &[ChartSeries]) -> Result<()> {
        let visible: Vec<ChartSeries> = series
            .iter()
            .map(|s| visible_on(s, spec.x_scale, spec.y_scale))
            .filter(|s| !s.points.is_empty())
            .collect();

        let Some((x_bounds, y_bounds)) = data_bounds(&visible) else {
            return Err(PerfPlotError::EmptyChart(spec.name.clone()));
        };

        if let Some(parent) = spec.output.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| PerfPlotError::io(parent, e))?;
            }
        }

        let x_range = axis_range(x_bounds, spec.x_scale);
        let y_range = axis_range(y_bounds, spec.y_scale);
        tracing::debug!(
            chart = %spec.name,
            x = ?x_range,
            y = ?y_range,
            series = visible.len(),
            "Axis ranges"
        );

        let backend = FontSafeBackend::new(BitMapBackend::new(
            &spec.output,
            (self.width, self.height),
        ));
        let root = backend.into_drawing_area();

        let drawn = match (spec.x_scale, spec.y_scale) {
            (AxisScale::Linear, AxisScale::Linear) => {
                self.draw(&root, spec, &visible, x_range, y_range)
            }
            (AxisScale::Linear, AxisScale::Log) => {
                self.draw(&root, spec, &visible, x_range, y_range.log_scale())
            }
            (AxisScale::Log, AxisScale::Linear) => {
                self.draw(&root, spec, &visible, x_range.log_scale(), y_range)
            }
            (AxisScale::Log, AxisScale::Log) => self.draw(
                &root,
                spec,
                &visible,
                x_range.log_scale(),
                y_range.log_scale(),
            ),
        };

        drawn
            .and_then(|()| root.present())
            .map_err(|e| PerfPlotError::Render {
                path: spec.output.clone(),
                message: e.to_string(),
            })
    }

    fn draw<DB, X, Y>(
        &self,
        root: &DrawingArea<DB, Shift>,
        spec: &ChartSpec,
        series: &[ChartSeries],
        x_spec: X,
        y_spec: Y,
    ) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>>
    where
        DB: DrawingBackend,
        X: AsRangedCoord<Value = f64>,
        Y: AsRangedCoord<Value = f64>,
        X::CoordDescType: ValueFormatter<f64>,
        Y::CoordDescType: ValueFormatter<f64>,
    {
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(root)
            .caption(&spec.title, ("sans-serif", 22))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(x_spec, y_spec)?;

        chart
            .configure_mesh()
            .x_desc(&spec.x_label)
            .y_desc(&spec.y_label)
            .x_label_formatter(&format_tick)
            .y_label_formatter(&format_tick)
            .label_style(("sans-serif", 14))
            .bold_line_style(BLACK.mix(0.2))
            .light_line_style(BLACK.mix(0.07))
            .draw()?;

        for (idx, s) in series.iter().enumerate() {
            let color = self.color_for(&s.list_type, idx);
            chart
                .draw_series(LineSeries::new(
                    s.points.iter().copied(),
                    color.stroke_width(LINE_WIDTH),
                ))?
                .label(&s.label)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 24, y)], color.stroke_width(LINE_WIDTH))
                });
        }

        if let Some(position) = series_label_position(self.legend_position) {
            chart
                .configure_series_labels()
                .position(position)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK.mix(0.3))
                .label_font(("sans-serif", 14))
                .draw()?;
        }

        Ok(())
    }
}

fn series_label_position(position: LegendPosition) -> Option<SeriesLabelPosition> {
    match position {
        LegendPosition::UpperLeft => Some(SeriesLabelPosition::UpperLeft),
        LegendPosition::UpperRight => Some(SeriesLabelPosition::UpperRight),
        LegendPosition::LowerLeft => Some(SeriesLabelPosition::LowerLeft),
        LegendPosition::LowerRight => Some(SeriesLabelPosition::LowerRight),
        LegendPosition::None => None,
    }
}

/// Drop points a log axis cannot place
fn visible_on(series: &ChartSeries, x_scale: AxisScale, y_scale: AxisScale) -> ChartSeries {
    let placeable = |v: f64, scale: AxisScale| {
        v.is_finite() && (scale == AxisScale::Linear || v > 0.0)
    };
    let points: Vec<(f64, f64)> = series
        .points
        .iter()
        .copied()
        .filter(|&(x, y)| placeable(x, x_scale) && placeable(y, y_scale))
        .collect();

    if points.len() < series.points.len() {
        tracing::warn!(
            list_type = %series.list_type,
            dropped = series.points.len() - points.len(),
            "Points outside the log axis domain were not drawn"
        );
    }

    ChartSeries {
        points,
        ..series.clone()
    }
}

/// (x min, x max), (y min, y max) over all points
fn data_bounds(series: &[ChartSeries]) -> Option<((f64, f64), (f64, f64))> {
    let mut points = series.iter().flat_map(|s| s.points.iter().copied());
    let (x0, y0) = points.next()?;

    Some(points.fold(((x0, x0), (y0, y0)), |((xl, xh), (yl, yh)), (x, y)| {
        ((xl.min(x), xh.max(x)), (yl.min(y), yh.max(y)))
    }))
}

/// Padded axis range for the data bounds
pub(crate) fn axis_range((min, max): (f64, f64), scale: AxisScale) -> Range<f64> {
    match scale {
        AxisScale::Log => (min / LOG_PADDING)..(max * LOG_PADDING),
        AxisScale::Linear => {
            let span = max - min;
            let pad = if span > 0.0 { span * LINEAR_PADDING } else { 1.0 };
            (min - pad)..(max + pad)
        }
    }
}

/// Tick label: integers in full below 1e7, two decimals in the mid range,
/// exponent form with a trimmed mantissa otherwise
pub(crate) fn format_tick(value: &f64) -> String {
    let magnitude = value.abs();
    if magnitude == 0.0 {
        "0".to_string()
    } else if magnitude < 1e7 && value.fract() == 0.0 {
        format!("{:.0}", value)
    } else if (1e-2..1e7).contains(&magnitude) {
        trim_fraction(&format!("{:.2}", value)).to_string()
    } else {
        let formatted = format!("{:.3e}", value);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) => format!("{}e{}", trim_fraction(mantissa), exponent),
            None => formatted,
        }
    }
}

/// "2.50" -> "2.5", "3.00" -> "3"
fn trim_fraction(fixed: &str) -> &str {
    if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed
    }
}
