use tracing::trace;

use crate::core::{AxisTicks, LinearScale, SeriesSet, Viewport};
use crate::error::ChartResult;
use crate::render::{LinePrimitive, PlotRect, RenderFrame, TextHAlign, TextPrimitive};

use super::ChartStyle;
use super::label_format::LabelFormatter;

/// Rotation applied to x-axis labels so long values do not collide.
pub const X_LABEL_ROTATION_DEG: f64 = -45.0;

/// Inputs of one composite pass, borrowed from the engine.
#[derive(Debug, Clone, Copy)]
pub struct Compositor<'a> {
    pub viewport: Viewport,
    pub plot: Option<PlotRect>,
    pub data: &'a SeriesSet,
    pub x_ticks: &'a AxisTicks,
    pub y_ticks: &'a AxisTicks,
    pub x_formatter: &'a LabelFormatter,
    pub y_formatter: &'a LabelFormatter,
    pub x_value_labels: bool,
    pub y_value_labels: bool,
    pub style: &'a ChartStyle,
}

impl Compositor<'_> {
    /// Builds the overlay frame around the off-screen plot surface.
    ///
    /// Without data or without a plot area the frame is empty, which the
    /// backend paints as a blank widget.
    pub fn compose(&self) -> ChartResult<RenderFrame> {
        let mut frame = RenderFrame::new(self.viewport);
        let Some(plot) = self.plot else {
            return Ok(frame);
        };
        if !self.data.has_points() {
            return Ok(frame);
        }

        let x_scale = LinearScale::from_ticks(self.x_ticks)?;
        let y_scale = LinearScale::from_ticks(self.y_ticks)?;

        if self.y_ticks.enabled {
            for value in self.y_ticks.tick_values() {
                let y = plot.y + y_scale.to_pixel_inverted(value, plot.height);
                frame.grid_lines.push(self.grid_line(plot.x, y, plot.right(), y));
                frame.texts.push(self.y_label(plot, y, value));
            }
        }

        if self.x_ticks.enabled {
            for value in self.x_ticks.tick_values() {
                let x = plot.x + x_scale.to_pixel(value, plot.width);
                frame.grid_lines.push(self.grid_line(x, plot.y, x, plot.bottom()));
                frame.texts.push(self.x_label(plot, x, value));
            }
        }

        if self.x_value_labels || self.y_value_labels {
            for line in self.data.series().iter().filter(|line| line.is_drawable()) {
                for point in line.points() {
                    if self.y_value_labels {
                        let y = plot.y + y_scale.to_pixel_inverted(point.y, plot.height);
                        frame.texts.push(self.y_label(plot, y, point.y));
                    }
                    if self.x_value_labels {
                        let x = plot.x + x_scale.to_pixel(point.x, plot.width);
                        frame.grid_lines.push(self.grid_line(x, plot.y, x, plot.bottom()));
                        frame.texts.push(self.x_label(plot, x, point.x));
                    }
                }
            }
        }

        frame.plot = Some(plot);

        let axis_width = self.style.axis_stroke_width_px();
        let axis_color = self.style.axis_color;
        frame.axis_lines.push(LinePrimitive::new(
            plot.x,
            plot.y,
            plot.x,
            plot.bottom() + axis_width / 2.0,
            axis_width,
            axis_color,
        ));
        frame.axis_lines.push(LinePrimitive::new(
            plot.x,
            plot.bottom(),
            plot.right(),
            plot.bottom(),
            axis_width,
            axis_color,
        ));

        trace!(
            grid_lines = frame.grid_lines.len(),
            texts = frame.texts.len(),
            "composed chart frame"
        );
        Ok(frame)
    }

    fn grid_line(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> LinePrimitive {
        LinePrimitive::new(
            x1,
            y1,
            x2,
            y2,
            self.style.grid_stroke_width_px(),
            self.style.grid_color,
        )
    }

    fn y_label(&self, plot: PlotRect, y: f64, value: f64) -> TextPrimitive {
        let font = self.style.label_font_size_px();
        TextPrimitive::new(
            self.y_formatter.format(value),
            plot.x - self.style.axis_label_padding_px(),
            y + font / 2.0,
            font,
            self.style.label_color,
            TextHAlign::Right,
        )
    }

    fn x_label(&self, plot: PlotRect, x: f64, value: f64) -> TextPrimitive {
        let font = self.style.label_font_size_px();
        TextPrimitive::new(
            self.x_formatter.format(value),
            x + font / 2.0,
            plot.bottom() + font / 2.0 + self.style.axis_label_padding_px(),
            font,
            self.style.label_color,
            TextHAlign::Right,
        )
        .with_rotation(X_LABEL_ROTATION_DEG)
    }
}
