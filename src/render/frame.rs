use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{LinePrimitive, PlotRect, TextPrimitive};

/// Backend-agnostic scene for one composite pass.
///
/// Backends paint the layers in field order: grid lines, labels, the
/// off-screen plot surface blitted into `plot`, then the axis baselines.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub grid_lines: Vec<LinePrimitive>,
    pub texts: Vec<TextPrimitive>,
    pub plot: Option<PlotRect>,
    pub axis_lines: Vec<LinePrimitive>,
}

impl RenderFrame {
    /// Frame with nothing on it; what the host paints before data or a
    /// surface exists.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            grid_lines: Vec::new(),
            texts: Vec::new(),
            plot: None,
            axis_lines: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_grid_line(mut self, line: LinePrimitive) -> Self {
        self.grid_lines.push(line);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.texts.push(text);
        self
    }

    #[must_use]
    pub fn with_plot(mut self, plot: PlotRect) -> Self {
        self.plot = Some(plot);
        self
    }

    #[must_use]
    pub fn with_axis_line(mut self, line: LinePrimitive) -> Self {
        self.axis_lines.push(line);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for line in self.grid_lines.iter().chain(&self.axis_lines) {
            line.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }
        if let Some(plot) = self.plot {
            if !plot.is_drawable() {
                return Err(ChartError::InvalidData(
                    "plot rectangle must have a positive, finite size".to_owned(),
                ));
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grid_lines.is_empty()
            && self.texts.is_empty()
            && self.plot.is_none()
            && self.axis_lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::RenderFrame;
    use crate::core::Viewport;
    use crate::render::{Color, LinePrimitive, PlotRect, TextHAlign, TextPrimitive};

    #[test]
    fn populated_frame_validates() {
        let frame = RenderFrame::new(Viewport::new(200, 100))
            .with_grid_line(LinePrimitive::new(20.0, 50.0, 190.0, 50.0, 1.0, Color::GRAY))
            .with_text(TextPrimitive::new("10", 17.0, 55.0, 10.0, Color::BLACK, TextHAlign::Right))
            .with_plot(PlotRect::new(20.0, 3.0, 170.0, 70.0))
            .with_axis_line(LinePrimitive::new(20.0, 73.0, 190.0, 73.0, 1.0, Color::BLACK));

        assert!(!frame.is_empty());
        assert!(frame.validate().is_ok());
    }

    #[test]
    fn degenerate_plot_rect_is_rejected() {
        let frame =
            RenderFrame::new(Viewport::new(200, 100)).with_plot(PlotRect::new(20.0, 3.0, 0.0, 70.0));
        assert!(frame.validate().is_err());
    }

    #[test]
    fn empty_frame_still_needs_a_viewport() {
        assert!(RenderFrame::new(Viewport::new(0, 100)).validate().is_err());
        assert!(RenderFrame::new(Viewport::new(10, 10)).is_empty());
    }
}
