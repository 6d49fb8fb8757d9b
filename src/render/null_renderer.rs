use crate::error::{ChartError, ChartResult};
use crate::render::{Color, LinePrimitive, LineStroke, PlotSurface, RenderFrame, Renderer};

/// One call received by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCommand {
    Clear,
    Lines {
        segments: Vec<f64>,
        stroke: LineStroke,
    },
    Dot {
        x: f64,
        y: f64,
        radius: f64,
        color: Color,
    },
}

/// Headless surface that records draw calls instead of rasterizing them.
///
/// Tests inspect the recorded geometry to compare progressive and
/// single-pass drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<SurfaceCommand>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    #[must_use]
    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.commands
    }

    /// Commands issued after the most recent clear.
    #[must_use]
    pub fn commands_since_clear(&self) -> &[SurfaceCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|command| matches!(command, SurfaceCommand::Clear))
            .map_or(0, |index| index + 1);
        &self.commands[start..]
    }

    /// Every segment currently on the surface, flattened out of its batch.
    #[must_use]
    pub fn segments(&self) -> Vec<LinePrimitive> {
        let mut out = Vec::new();
        for command in self.commands_since_clear() {
            if let SurfaceCommand::Lines { segments, stroke } = command {
                out.extend(segments.chunks_exact(4).map(|quad| {
                    LinePrimitive::new(quad[0], quad[1], quad[2], quad[3], stroke.width, stroke.color)
                }));
            }
        }
        out
    }

    /// Dots currently on the surface as `(x, y, radius)`.
    #[must_use]
    pub fn dots(&self) -> Vec<(f64, f64, f64)> {
        self.commands_since_clear()
            .iter()
            .filter_map(|command| match command {
                SurfaceCommand::Dot { x, y, radius, .. } => Some((*x, *y, *radius)),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, SurfaceCommand::Clear))
            .count()
    }
}

impl PlotSurface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) -> ChartResult<()> {
        self.commands.push(SurfaceCommand::Clear);
        Ok(())
    }

    fn draw_lines(&mut self, segments: &[f64], stroke: LineStroke) -> ChartResult<()> {
        if segments.len() % 4 != 0 {
            return Err(ChartError::InvalidData(
                "segment buffer length must be a multiple of 4".to_owned(),
            ));
        }
        if segments.iter().any(|value| !value.is_finite()) {
            return Err(ChartError::InvalidData(
                "segment coordinates must be finite".to_owned(),
            ));
        }
        self.commands.push(SurfaceCommand::Lines {
            segments: segments.to_vec(),
            stroke,
        });
        Ok(())
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color) -> ChartResult<()> {
        self.commands.push(SurfaceCommand::Dot {
            x: cx,
            y: cy,
            radius,
            color,
        });
        Ok(())
    }
}

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates frame content so tests catch invalid geometry without
/// a real backend.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub surfaces_created: usize,
    pub last_grid_line_count: usize,
    pub last_text_count: usize,
    pub last_axis_line_count: usize,
    pub last_blitted_segment_count: usize,
    pub last_frame: Option<RenderFrame>,
}

impl Renderer for NullRenderer {
    type Surface = RecordingSurface;

    fn create_surface(&mut self, width: u32, height: u32) -> ChartResult<Self::Surface> {
        if width == 0 || height == 0 {
            return Err(ChartError::InvalidViewport { width, height });
        }
        self.surfaces_created += 1;
        Ok(RecordingSurface::new(width, height))
    }

    fn render(&mut self, frame: &RenderFrame, surface: Option<&Self::Surface>) -> ChartResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_grid_line_count = frame.grid_lines.len();
        self.last_text_count = frame.texts.len();
        self.last_axis_line_count = frame.axis_lines.len();
        self.last_blitted_segment_count = match (frame.plot, surface) {
            (Some(_), Some(surface)) => surface.segments().len(),
            _ => 0,
        };
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}
