use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::core::{AxisTicks, DataPoint, LinearScale, SeriesSet};
use crate::error::ChartResult;
use crate::render::{LineStroke, PlotSurface};

use super::ChartStyle;

/// Animation state of the progressive draw.
///
/// `Idle` is both the initial and the terminal state of every data version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RenderPhase {
    #[default]
    Idle,
    ClearingBuffer,
    DrawingSegment,
}

/// The only state carried from one animation frame to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderCursor {
    /// Index of the first point column not yet drawn.
    pub next_point_index: usize,
    /// Budget of new surface points per frame, summed over series.
    pub draw_per_tick: usize,
    /// Set when the surface holds geometry from a previous data version.
    pub buffer_dirty: bool,
}

/// What the host should do after one frame step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Repaint and schedule another frame after the frame interval.
    Continue,
    /// Repaint; the chain has reached `Idle`.
    Finished,
    /// Nothing drawn and nothing to schedule (hidden, no surface, stale frame).
    Halted,
}

type ColumnPoints = SmallVec<[(f64, f64); 8]>;

/// Resumable state machine painting a growing line chart into a persistent
/// off-screen surface, a bounded number of points per frame.
#[derive(Debug)]
pub struct ProgressiveRenderer<S: PlotSurface> {
    phase: RenderPhase,
    cursor: RenderCursor,
    surface: Option<S>,
    scan: Vec<ColumnPoints>,
    vertices: Vec<f64>,
}

impl<S: PlotSurface> ProgressiveRenderer<S> {
    #[must_use]
    pub fn new(draw_per_tick: usize) -> Self {
        Self {
            phase: RenderPhase::Idle,
            cursor: RenderCursor {
                next_point_index: 0,
                draw_per_tick: draw_per_tick.max(1),
                buffer_dirty: false,
            },
            surface: None,
            scan: Vec::new(),
            vertices: Vec::new(),
        }
    }

    #[must_use]
    pub fn phase(&self) -> RenderPhase {
        self.phase
    }

    #[must_use]
    pub fn cursor(&self) -> RenderCursor {
        self.cursor
    }

    #[must_use]
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Installs a freshly allocated surface, or drops the current one when
    /// the plot area became degenerate.
    pub fn replace_surface(&mut self, surface: Option<S>) {
        self.surface = surface;
    }

    pub fn set_draw_per_tick(&mut self, draw_per_tick: usize) {
        self.cursor.draw_per_tick = draw_per_tick.max(1);
    }

    /// Resets the cursor without starting anything. An in-flight chain
    /// clears and redraws from its next frame on.
    pub fn rewind(&mut self) {
        self.cursor.next_point_index = 0;
        self.cursor.buffer_dirty = true;
        if self.phase != RenderPhase::Idle {
            self.phase = RenderPhase::ClearingBuffer;
        }
    }

    /// Rewinds to the start of a new draw cycle.
    ///
    /// Returns `true` when no chain is in flight and the caller must start
    /// one. An in-flight chain observes the reset on its next frame.
    pub fn restart(&mut self) -> bool {
        let was_idle = self.phase == RenderPhase::Idle;
        self.rewind();
        self.phase = RenderPhase::ClearingBuffer;
        was_idle
    }

    /// Drops back to `Idle`, keeping the cursor.
    pub fn halt(&mut self) {
        self.phase = RenderPhase::Idle;
    }

    /// Runs one animation frame.
    pub fn step(
        &mut self,
        data: &SeriesSet,
        x_ticks: &AxisTicks,
        y_ticks: &AxisTicks,
        style: &ChartStyle,
        visible: bool,
    ) -> ChartResult<StepOutcome> {
        if !visible {
            trace!(
                cursor = self.cursor.next_point_index,
                "hidden, halting draw chain"
            );
            self.phase = RenderPhase::Idle;
            return Ok(StepOutcome::Halted);
        }
        let Some(surface) = self.surface.as_mut() else {
            trace!("no plot surface, halting draw chain");
            self.phase = RenderPhase::Idle;
            return Ok(StepOutcome::Halted);
        };

        match self.phase {
            RenderPhase::Idle => Ok(StepOutcome::Halted),
            RenderPhase::ClearingBuffer => {
                surface.clear()?;
                self.cursor.buffer_dirty = false;
                self.phase = RenderPhase::DrawingSegment;
                trace!("plot surface cleared");
                Ok(StepOutcome::Continue)
            }
            RenderPhase::DrawingSegment => {
                if !data.has_points() {
                    self.phase = RenderPhase::Idle;
                    return Ok(StepOutcome::Finished);
                }
                let next = draw_segments(
                    surface,
                    &mut self.scan,
                    &mut self.vertices,
                    data,
                    x_ticks,
                    y_ticks,
                    style,
                    self.cursor,
                )?;
                self.cursor.next_point_index = next;

                let max_point_count = data.max_point_count();
                trace!(cursor = next, max_point_count, "drew segment batch");
                if next < max_point_count {
                    Ok(StepOutcome::Continue)
                } else {
                    self.phase = RenderPhase::Idle;
                    Ok(StepOutcome::Finished)
                }
            }
        }
    }
}

/// Paints the next batch and returns the new scan position.
///
/// Scanning resumes one column before the cursor so each batch starts at
/// the last point of the previous one. Columns advance all drawable series
/// in lockstep until `draw_per_tick` new points (the first column excluded)
/// have been placed or the longest series runs out.
#[allow(clippy::too_many_arguments)]
fn draw_segments<S: PlotSurface>(
    surface: &mut S,
    scan: &mut Vec<ColumnPoints>,
    vertices: &mut Vec<f64>,
    data: &SeriesSet,
    x_ticks: &AxisTicks,
    y_ticks: &AxisTicks,
    style: &ChartStyle,
    cursor: RenderCursor,
) -> ChartResult<usize> {
    let x_scale = LinearScale::from_ticks(x_ticks)?;
    let y_scale = LinearScale::from_ticks(y_ticks)?;
    let width = f64::from(surface.width());
    let height = f64::from(surface.height());

    let series = data.series();
    let max_point_count = data.max_point_count();
    scan.resize_with(series.len(), ColumnPoints::new);
    for points in scan.iter_mut() {
        points.clear();
    }

    let start_index = cursor.next_point_index.saturating_sub(1);
    let mut index = start_index;
    let mut placed = 0usize;
    let mut column = 0usize;
    while placed < cursor.draw_per_tick && index < max_point_count {
        for (slot, line) in series.iter().enumerate() {
            if !line.is_drawable() {
                continue;
            }
            let Some(point) = line.points().get(index) else {
                continue;
            };
            scan[slot].push((
                x_scale.to_pixel(point.x, width),
                y_scale.to_pixel_inverted(point.y, height),
            ));
            if column > 0 {
                placed += 1;
            }
        }
        column += 1;
        index += 1;
    }

    for (slot, line) in series.iter().enumerate() {
        if !line.is_drawable() {
            continue;
        }
        let points = &scan[slot];
        let stroke = LineStroke::new(
            style.series_stroke_width_px(),
            line.color().unwrap_or(style.default_series_color),
        );

        vertices.clear();
        for pair in points.windows(2) {
            vertices.extend_from_slice(&[pair[0].0, pair[0].1, pair[1].0, pair[1].1]);
        }
        if !vertices.is_empty() {
            surface.draw_lines(vertices, stroke)?;
        }
        if let (0, Some(&(x, y))) = (start_index, points.first()) {
            if collapses_to_point(line.points()) {
                surface.fill_circle(x, y, stroke.width / 2.0, stroke.color)?;
            }
        }
    }

    Ok(index)
}

/// A series whose points all coincide (including a single-point series)
/// would draw nothing visible, so it gets a dot with its first batch.
fn collapses_to_point(points: &[DataPoint]) -> bool {
    match points {
        [] => false,
        [first, rest @ ..] => rest.iter().all(|point| point == first),
    }
}
