mod frame;
mod null_renderer;
mod primitives;

pub use frame::RenderFrame;
pub use null_renderer::{NullRenderer, RecordingSurface, SurfaceCommand};
pub use primitives::{
    Color, LinePrimitive, LineStroke, PlotRect, TextHAlign, TextPrimitive,
};

use crate::error::ChartResult;

/// Persistent off-screen buffer sized to the plot area.
///
/// The progressive renderer owns one of these and keeps painting into it
/// across frames; it is cleared, not reallocated, when a draw cycle restarts.
pub trait PlotSurface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Wipes the buffer to transparent.
    fn clear(&mut self) -> ChartResult<()>;

    /// Strokes a batch of independent segments with one stroke.
    ///
    /// `segments` is a flat `[x1, y1, x2, y2, ...]` list, four values per
    /// segment, in surface pixel coordinates.
    fn draw_lines(&mut self, segments: &[f64], stroke: LineStroke) -> ChartResult<()>;

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color) -> ChartResult<()>;
}

/// Contract implemented by any rendering backend.
///
/// A backend creates the off-screen surfaces the progressive renderer paints
/// into, and composites a fully materialized `RenderFrame` (plus the current
/// surface) onto the visible target.
pub trait Renderer {
    type Surface: PlotSurface;

    fn create_surface(&mut self, width: u32, height: u32) -> ChartResult<Self::Surface>;

    fn render(&mut self, frame: &RenderFrame, surface: Option<&Self::Surface>) -> ChartResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer, CairoSurface};
