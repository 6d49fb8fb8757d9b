use tracing::debug;

use crate::core::{AxisTicks, DataPoint, SeriesSet};
use crate::error::ChartResult;
use crate::render::Renderer;

use super::engine::calibrate_for;
use super::json_contract::SeriesPayload;
use super::validation::validate_ticks;
use super::{ChartEngine, FrameHost};

impl<R: Renderer, H: FrameHost> ChartEngine<R, H> {
    /// Replaces all series and restarts the progressive draw.
    ///
    /// The update is atomic: a bad color string rejects it before anything
    /// changes.
    pub fn set_data(
        &mut self,
        names: Vec<Option<String>>,
        points: Vec<Vec<DataPoint>>,
        colors: &[Option<String>],
    ) -> ChartResult<()> {
        let data = SeriesSet::ingest(names, points, colors)?;
        self.set_series(data)
    }

    /// Replaces all series with an already-ingested set.
    pub fn set_series(&mut self, data: SeriesSet) -> ChartResult<()> {
        let (x_ticks, y_ticks) = calibrate_for(&data, self.x_ticks, self.y_ticks)?;
        self.x_ticks = x_ticks;
        self.y_ticks = y_ticks;
        self.data = data;
        debug!(
            series = self.data.series().len(),
            max_point_count = self.data.max_point_count(),
            "series data replaced"
        );

        self.refresh_layout(false)?;
        self.restart()
    }

    /// Replaces all series from the bridge's named-series JSON payload.
    pub fn set_data_json(&mut self, input: &str) -> ChartResult<()> {
        let data = SeriesPayload::from_json_str(input)?
            .into_ingest_input()
            .into_series_set()?;
        self.set_series(data)
    }

    /// Replaces the x-axis tick options and recalibrates against the
    /// current data.
    pub fn set_x_ticks(&mut self, ticks: AxisTicks) -> ChartResult<()> {
        let ticks = validate_ticks(ticks, "x")?;
        let (x_ticks, _) = calibrate_for(&self.data, ticks, self.y_ticks)?;
        self.x_ticks = x_ticks;
        self.params.x_ticks = ticks.into();

        self.restart()
    }

    /// Replaces the y-axis tick options; the plot area follows the width of
    /// the new top label.
    pub fn set_y_ticks(&mut self, ticks: AxisTicks) -> ChartResult<()> {
        let ticks = validate_ticks(ticks, "y")?;
        let (_, y_ticks) = calibrate_for(&self.data, self.x_ticks, ticks)?;
        self.y_ticks = y_ticks;
        self.params.y_ticks = ticks.into();

        self.refresh_layout(false)?;
        self.restart()
    }
}
