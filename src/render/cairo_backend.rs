use cairo::{Context, Format, ImageSurface, Operator};
use pango::FontDescription;
use std::f64::consts::TAU;

use crate::error::{ChartError, ChartResult};
use crate::render::{
    Color, LinePrimitive, LineStroke, PlotSurface, RenderFrame, Renderer, TextHAlign,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub lines_drawn: usize,
    pub texts_drawn: usize,
    pub surfaces_blitted: usize,
}

/// Off-screen ARGB32 image surface the progressive renderer paints into.
#[derive(Debug)]
pub struct CairoSurface {
    image: ImageSurface,
}

impl CairoSurface {
    pub fn new(width: u32, height: u32) -> ChartResult<Self> {
        let (Ok(w), Ok(h)) = (i32::try_from(width), i32::try_from(height)) else {
            return Err(ChartError::InvalidViewport { width, height });
        };
        if w <= 0 || h <= 0 {
            return Err(ChartError::InvalidViewport { width, height });
        }
        let image = ImageSurface::create(Format::ARgb32, w, h)
            .map_err(|err| map_backend_error("failed to create plot surface", err))?;
        Ok(Self { image })
    }

    #[must_use]
    pub fn image(&self) -> &ImageSurface {
        &self.image
    }

    fn context(&self) -> ChartResult<Context> {
        Context::new(&self.image)
            .map_err(|err| map_backend_error("failed to create plot surface context", err))
    }
}

impl PlotSurface for CairoSurface {
    fn width(&self) -> u32 {
        self.image.width().max(0) as u32
    }

    fn height(&self) -> u32 {
        self.image.height().max(0) as u32
    }

    fn clear(&mut self) -> ChartResult<()> {
        let context = self.context()?;
        context.set_operator(Operator::Clear);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear plot surface", err))
    }

    fn draw_lines(&mut self, segments: &[f64], stroke: LineStroke) -> ChartResult<()> {
        if segments.is_empty() {
            return Ok(());
        }
        let context = self.context()?;
        context.set_antialias(cairo::Antialias::Best);
        apply_color(&context, stroke.color);
        context.set_line_width(stroke.width);
        for quad in segments.chunks_exact(4) {
            context.move_to(quad[0], quad[1]);
            context.line_to(quad[2], quad[3]);
        }
        context
            .stroke()
            .map_err(|err| map_backend_error("failed to stroke series segments", err))
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color) -> ChartResult<()> {
        let context = self.context()?;
        apply_color(&context, color);
        context.arc(cx, cy, radius, 0.0, TAU);
        context
            .fill()
            .map_err(|err| map_backend_error("failed to fill series dot", err))
    }
}

/// Renderers that can composite into an external Cairo context (for example
/// a GTK `DrawingArea` draw callback).
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
        surface: Option<&CairoSurface>,
    ) -> ChartResult<()>;
}

/// Cairo + Pango + PangoCairo renderer backend.
///
/// Composites either into its own image surface through `Renderer::render`
/// or into a host-provided context through `CairoContextRenderer`.
#[derive(Debug)]
pub struct CairoRenderer {
    target: ImageSurface,
    clear_color: Color,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> ChartResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::InvalidData(
                "cairo surface size must be > 0".to_owned(),
            ));
        }

        let target = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            target,
            clear_color: Color::rgb(1.0, 1.0, 1.0),
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn target(&self) -> &ImageSurface {
        &self.target
    }

    pub fn set_clear_color(&mut self, color: Color) -> ChartResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn render_with_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
        surface: Option<&CairoSurface>,
    ) -> ChartResult<()> {
        frame.validate()?;

        apply_color(context, self.clear_color);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear target", err))?;

        let mut stats = CairoRenderStats::default();

        for line in &frame.grid_lines {
            stroke_line(context, line)?;
            stats.lines_drawn += 1;
        }

        for text in &frame.texts {
            let layout = pangocairo::functions::create_layout(context);
            let font_description =
                FontDescription::from_string(&format!("Sans {}px", text.font_size_px));
            layout.set_font_description(Some(&font_description));
            layout.set_text(&text.text);

            let (text_width, _) = layout.pixel_size();
            let dx = match text.h_align {
                TextHAlign::Left => 0.0,
                TextHAlign::Center => -f64::from(text_width) / 2.0,
                TextHAlign::Right => -f64::from(text_width),
            };
            let baseline = f64::from(layout.baseline()) / f64::from(pango::SCALE);

            context
                .save()
                .map_err(|err| map_backend_error("failed to save context", err))?;
            context.translate(text.x, text.y);
            context.rotate(text.rotation_deg.to_radians());
            apply_color(context, text.color);
            context.move_to(dx, -baseline);
            pangocairo::functions::show_layout(context, &layout);
            context
                .restore()
                .map_err(|err| map_backend_error("failed to restore context", err))?;
            stats.texts_drawn += 1;
        }

        if let (Some(plot), Some(surface)) = (frame.plot, surface) {
            context
                .save()
                .map_err(|err| map_backend_error("failed to save context", err))?;
            context.rectangle(plot.x, plot.y, plot.width, plot.height);
            context.clip();
            context
                .set_source_surface(surface.image(), plot.x, plot.y)
                .map_err(|err| map_backend_error("failed to bind plot surface", err))?;
            context
                .paint()
                .map_err(|err| map_backend_error("failed to blit plot surface", err))?;
            context
                .restore()
                .map_err(|err| map_backend_error("failed to restore context", err))?;
            stats.surfaces_blitted += 1;
        }

        for line in &frame.axis_lines {
            stroke_line(context, line)?;
            stats.lines_drawn += 1;
        }

        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    type Surface = CairoSurface;

    fn create_surface(&mut self, width: u32, height: u32) -> ChartResult<Self::Surface> {
        CairoSurface::new(width, height)
    }

    fn render(&mut self, frame: &RenderFrame, surface: Option<&Self::Surface>) -> ChartResult<()> {
        let context = Context::new(&self.target)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_with_context(&context, frame, surface)
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
        surface: Option<&CairoSurface>,
    ) -> ChartResult<()> {
        self.render_with_context(context, frame, surface)
    }
}

fn stroke_line(context: &Context, line: &LinePrimitive) -> ChartResult<()> {
    apply_color(context, line.color);
    context.set_line_width(line.stroke_width);
    context.move_to(line.x1, line.y1);
    context.line_to(line.x2, line.y2);
    context
        .stroke()
        .map_err(|err| map_backend_error("failed to stroke line", err))
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::Backend(format!("{prefix}: {err}"))
}
