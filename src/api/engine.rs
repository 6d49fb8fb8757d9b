use std::time::Duration;

use tracing::{debug, warn};

use crate::core::{AxisTicks, SeriesSet, Viewport, calibrate};
use crate::error::{ChartError, ChartResult};
use crate::render::{PlotRect, PlotSurface, RenderFrame, Renderer};

use super::compositor::Compositor;
use super::label_format::LabelFormatter;
use super::layout::resolve_plot_rect;
use super::progressive_renderer::{ProgressiveRenderer, StepOutcome};
use super::validation::{validate_draw_count_per_frame, validate_fps, validate_params};
use super::{ChartEngineConfig, ChartParams, ChartStyle, FrameHost, frame_interval};

#[cfg(feature = "cairo-backend")]
use crate::render::CairoContextRenderer;

/// Chart facade consumed by host widgets.
///
/// `ChartEngine` owns the data, the calibrated axes and the progressive
/// renderer, and talks to the host only through `R` (surfaces and
/// compositing) and `H` (frame pacing and repaint requests). Every method
/// runs on the host's UI thread; `&mut self` is the exclusive-access guard
/// for the ticks shared by the render and composite passes.
pub struct ChartEngine<R: Renderer, H: FrameHost> {
    pub(super) renderer: R,
    pub(super) host: H,
    pub(super) viewport: Viewport,
    pub(super) style: ChartStyle,
    pub(super) params: ChartParams,
    pub(super) x_ticks: AxisTicks,
    pub(super) y_ticks: AxisTicks,
    pub(super) x_formatter: LabelFormatter,
    pub(super) y_formatter: LabelFormatter,
    pub(super) frame_interval: Duration,
    pub(super) data: SeriesSet,
    pub(super) plot: Option<PlotRect>,
    pub(super) visible: bool,
    pub(super) progressive: ProgressiveRenderer<R::Surface>,
}

impl<R: Renderer, H: FrameHost> ChartEngine<R, H> {
    /// Creates an engine with no data. Nothing is scheduled until data
    /// arrives.
    pub fn new(renderer: R, host: H, config: ChartEngineConfig) -> ChartResult<Self> {
        config.style.validate()?;
        let validated = validate_params(&config.params)?;

        let mut engine = Self {
            renderer,
            host,
            viewport: config.viewport,
            style: config.style,
            params: config.params,
            x_ticks: validated.x_ticks,
            y_ticks: validated.y_ticks,
            x_formatter: validated.x_formatter,
            y_formatter: validated.y_formatter,
            frame_interval: frame_interval(validated.fps),
            data: SeriesSet::default(),
            plot: None,
            visible: true,
            progressive: ProgressiveRenderer::new(validated.draw_per_tick),
        };
        engine.refresh_layout(true)?;
        debug!(
            width = engine.viewport.width,
            height = engine.viewport.height,
            has_surface = engine.plot.is_some(),
            "chart engine created"
        );
        Ok(engine)
    }

    /// Replaces the whole configuration and restarts the draw.
    ///
    /// Everything is validated first; a rejected update changes nothing.
    pub fn set_params(&mut self, params: ChartParams) -> ChartResult<()> {
        let validated = validate_params(&params)?;
        let (x_ticks, y_ticks) =
            calibrate_for(&self.data, validated.x_ticks, validated.y_ticks)?;

        self.x_ticks = x_ticks;
        self.y_ticks = y_ticks;
        self.x_formatter = validated.x_formatter;
        self.y_formatter = validated.y_formatter;
        self.frame_interval = frame_interval(validated.fps);
        self.progressive.set_draw_per_tick(validated.draw_per_tick);
        self.params = params;
        debug!(
            fps = validated.fps,
            draw_per_tick = validated.draw_per_tick,
            "chart params applied"
        );

        self.refresh_layout(false)?;
        self.restart()
    }

    /// Changes the frame rate of the running and future animations.
    pub fn set_fps(&mut self, fps: u32) -> ChartResult<()> {
        let fps = validate_fps(fps)?;
        self.params.fps = fps;
        self.frame_interval = frame_interval(fps);
        Ok(())
    }

    /// Changes how many new points each frame adds, from the next frame on.
    pub fn set_draw_count_per_frame(&mut self, count: u32) -> ChartResult<()> {
        let draw_per_tick = validate_draw_count_per_frame(count)?;
        self.params.draw_count_per_frame = count;
        self.progressive.set_draw_per_tick(draw_per_tick);
        Ok(())
    }

    pub fn set_x_value_label_enabled(&mut self, enabled: bool) {
        self.params.x_value_label_enabled = enabled;
        self.host.request_repaint();
    }

    pub fn set_y_value_label_enabled(&mut self, enabled: bool) {
        self.params.y_value_label_enabled = enabled;
        self.host.request_repaint();
    }

    /// Applies a new widget size.
    ///
    /// A zero-sized viewport only rewinds the cursor; the current surface is
    /// kept until a usable size arrives.
    pub fn resize(&mut self, width: u32, height: u32) -> ChartResult<()> {
        let viewport = Viewport::new(width, height);
        if !viewport.is_valid() {
            debug!(width, height, "ignoring zero-sized resize");
            self.progressive.rewind();
            return Ok(());
        }
        self.viewport = viewport;
        self.refresh_layout(true)?;
        self.restart()
    }

    /// Hiding halts the chain at its next frame and keeps the cursor;
    /// showing recreates the surface and draws from the start.
    pub fn set_visible(&mut self, visible: bool) -> ChartResult<()> {
        if self.visible == visible {
            return Ok(());
        }
        self.visible = visible;
        debug!(visible, "chart visibility changed");
        if !visible {
            return Ok(());
        }
        self.refresh_layout(true)?;
        self.restart()
    }

    /// Scheduled continuation entry point: runs one frame of the progressive
    /// draw and schedules the next one while the chain is active.
    pub fn on_frame_tick(&mut self) -> ChartResult<()> {
        let outcome = self.progressive.step(
            &self.data,
            &self.x_ticks,
            &self.y_ticks,
            &self.style,
            self.visible,
        );
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "progressive draw failed, chain stopped");
                self.progressive.halt();
                return Err(err);
            }
        };

        match outcome {
            StepOutcome::Continue => {
                self.host.request_repaint();
                self.host.schedule_frame(self.frame_interval);
            }
            StepOutcome::Finished => self.host.request_repaint(),
            StepOutcome::Halted => {}
        }
        Ok(())
    }

    /// Assembles the overlay frame for the current state.
    pub fn compose_frame(&self) -> ChartResult<RenderFrame> {
        let plot = if self.visible && self.progressive.surface().is_some() {
            self.plot
        } else {
            None
        };
        Compositor {
            viewport: self.viewport,
            plot,
            data: &self.data,
            x_ticks: &self.x_ticks,
            y_ticks: &self.y_ticks,
            x_formatter: &self.x_formatter,
            y_formatter: &self.y_formatter,
            x_value_labels: self.params.x_value_label_enabled,
            y_value_labels: self.params.y_value_label_enabled,
            style: &self.style,
        }
        .compose()
    }

    /// Host paint callback: composites overlays and the plot surface.
    pub fn paint(&mut self) -> ChartResult<()> {
        self.paint_with(|renderer, frame, surface| renderer.render(frame, surface))
    }

    /// Paints through a caller-provided composite step, for hosts that own
    /// the drawing target.
    pub fn paint_with<F>(&mut self, composite: F) -> ChartResult<()>
    where
        F: FnOnce(&mut R, &RenderFrame, Option<&R::Surface>) -> ChartResult<()>,
    {
        if !self.viewport.is_valid() {
            return Ok(());
        }
        let frame = self.compose_frame()?;
        composite(&mut self.renderer, &frame, self.progressive.surface())
    }

    /// Composites into an external cairo context, as GTK draw callbacks do.
    #[cfg(feature = "cairo-backend")]
    pub fn paint_on_cairo_context(&mut self, context: &cairo::Context) -> ChartResult<()>
    where
        R: Renderer<Surface = crate::render::CairoSurface> + CairoContextRenderer,
    {
        self.paint_with(|renderer, frame, surface| {
            renderer.render_on_cairo_context(context, frame, surface)
        })
    }

    /// Stops the animation and drops any pending frame.
    pub fn shutdown(&mut self) {
        self.progressive.halt();
        self.host.cancel_frame();
    }

    /// Rewinds the progressive draw; starts a chain only when none is in
    /// flight. A chain whose frame was lost (the host dropped it without
    /// firing) counts as not in flight.
    pub(super) fn restart(&mut self) -> ChartResult<()> {
        if self.progressive.restart() || !self.host.has_pending_frame() {
            self.on_frame_tick()?;
        }
        Ok(())
    }

    /// Re-resolves the plot rectangle and reallocates the surface when its
    /// size changed (or always, with `force`).
    pub(super) fn refresh_layout(&mut self, force: bool) -> ChartResult<()> {
        let plot = if self.viewport.is_valid() && self.visible {
            resolve_plot_rect(self.viewport, &self.style, &self.y_ticks)
        } else {
            None
        };

        let Some(plot) = plot else {
            if self.plot.is_some() || self.progressive.surface().is_some() {
                warn!(
                    width = self.viewport.width,
                    height = self.viewport.height,
                    "plot area is degenerate, drawing disabled"
                );
            }
            self.plot = None;
            self.progressive.replace_surface(None);
            return Ok(());
        };

        let (width, height) = (plot.width as u32, plot.height as u32);
        let same_size = self
            .progressive
            .surface()
            .is_some_and(|surface| surface.width() == width && surface.height() == height);
        self.plot = Some(plot);
        if force || !same_size {
            let surface = self.renderer.create_surface(width, height)?;
            self.progressive.replace_surface(Some(surface));
            debug!(width, height, "plot surface allocated");
        }
        Ok(())
    }
}

impl<R: Renderer, H: FrameHost> Drop for ChartEngine<R, H> {
    fn drop(&mut self) {
        self.host.cancel_frame();
    }
}

/// Calibrates both axes against the bounds of `data`. Without points the
/// ticks are returned as configured.
pub(super) fn calibrate_for(
    data: &SeriesSet,
    x_ticks: AxisTicks,
    y_ticks: AxisTicks,
) -> ChartResult<(AxisTicks, AxisTicks)> {
    let (Some(x_range), Some(y_range)) = (data.x_range(), data.y_range()) else {
        return Ok((x_ticks, y_ticks));
    };
    let x_ticks = calibrate(x_ticks, x_range.min, x_range.max)?;
    let y_ticks = calibrate(y_ticks, y_range.min, y_range.max)?;
    for (axis, ticks) in [("x", &x_ticks), ("y", &y_ticks)] {
        if ticks.span() <= 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "{axis}-axis ticks: pinned bound leaves an empty axis [{}, {}]",
                ticks.value_min, ticks.value_max
            )));
        }
    }
    Ok((x_ticks, y_ticks))
}
