use std::time::Duration;

use crate::core::{AxisTicks, SeriesSet, Viewport};
use crate::error::ChartResult;
use crate::render::{PlotRect, Renderer};

use super::{
    ChartEngine, ChartParams, ChartStyle, EngineSnapshot, FrameHost, RenderCursor, RenderPhase,
    SeriesSnapshot,
};

impl<R: Renderer, H: FrameHost> ChartEngine<R, H> {
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    #[must_use]
    pub fn params(&self) -> &ChartParams {
        &self.params
    }

    /// Calibrated x-axis ticks.
    #[must_use]
    pub fn x_ticks(&self) -> AxisTicks {
        self.x_ticks
    }

    /// Calibrated y-axis ticks.
    #[must_use]
    pub fn y_ticks(&self) -> AxisTicks {
        self.y_ticks
    }

    #[must_use]
    pub fn data(&self) -> &SeriesSet {
        &self.data
    }

    /// Where the plot surface is composited, if drawing is possible.
    #[must_use]
    pub fn plot_rect(&self) -> Option<PlotRect> {
        self.plot
    }

    #[must_use]
    pub fn plot_surface(&self) -> Option<&R::Surface> {
        self.progressive.surface()
    }

    #[must_use]
    pub fn phase(&self) -> RenderPhase {
        self.progressive.phase()
    }

    #[must_use]
    pub fn cursor(&self) -> RenderCursor {
        self.progressive.cursor()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        let series = self
            .data
            .series()
            .iter()
            .map(|line| SeriesSnapshot {
                name: line.name().map(str::to_owned),
                point_count: line.len(),
                drawable: line.is_drawable(),
            })
            .collect();

        EngineSnapshot {
            viewport: self.viewport,
            visible: self.visible,
            plot: self.plot,
            phase: self.progressive.phase(),
            cursor: self.progressive.cursor(),
            fps: self.params.fps,
            x_ticks: self.x_ticks,
            y_ticks: self.y_ticks,
            x_range: self.data.x_range(),
            y_range: self.data.y_range(),
            series,
        }
    }

    pub fn snapshot_json_pretty(&self) -> ChartResult<String> {
        self.snapshot().to_json_pretty()
    }
}
