use serde::{Deserialize, Serialize};

use crate::core::{AxisTicks, ValueRange, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::PlotRect;

use super::{RenderCursor, RenderPhase};

/// Per-series summary kept in snapshots instead of the raw points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSnapshot {
    /// Legend name; `None` for placeholder series.
    pub name: Option<String>,
    pub point_count: usize,
    pub drawable: bool,
}

/// Serializable deterministic state snapshot used by regression tests and
/// host diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub viewport: Viewport,
    pub visible: bool,
    pub plot: Option<PlotRect>,
    pub phase: RenderPhase,
    pub cursor: RenderCursor,
    pub fps: u32,
    pub x_ticks: AxisTicks,
    pub y_ticks: AxisTicks,
    pub x_range: Option<ValueRange>,
    pub y_range: Option<ValueRange>,
    /// In legend order; duplicate names keep one entry each.
    pub series: Vec<SeriesSnapshot>,
}

impl EngineSnapshot {
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize snapshot: {e}")))
    }
}
