use crate::core::AxisTicks;
use crate::error::{ChartError, ChartResult};

use super::ChartParams;
use super::label_format::LabelFormatter;

pub(super) fn validate_ticks(ticks: AxisTicks, axis: &str) -> ChartResult<AxisTicks> {
    ticks
        .validate()
        .map_err(|err| ChartError::InvalidConfig(format!("{axis}-axis ticks: {err}")))?;
    Ok(ticks)
}

pub(super) fn validate_fps(fps: u32) -> ChartResult<u32> {
    if fps == 0 {
        return Err(ChartError::InvalidConfig("fps must be > 0".to_owned()));
    }
    Ok(fps)
}

pub(super) fn validate_draw_count_per_frame(count: u32) -> ChartResult<usize> {
    if count == 0 {
        return Err(ChartError::InvalidConfig(
            "drawCountPerFrame must be > 0".to_owned(),
        ));
    }
    Ok(count as usize)
}

/// Everything `set_params` applies, checked up front so a rejected update
/// leaves the engine untouched.
pub(super) struct ValidatedParams {
    pub(super) x_ticks: AxisTicks,
    pub(super) y_ticks: AxisTicks,
    pub(super) fps: u32,
    pub(super) draw_per_tick: usize,
    pub(super) x_formatter: LabelFormatter,
    pub(super) y_formatter: LabelFormatter,
}

pub(super) fn validate_params(params: &ChartParams) -> ChartResult<ValidatedParams> {
    Ok(ValidatedParams {
        x_ticks: validate_ticks(params.x_ticks.into(), "x")?,
        y_ticks: validate_ticks(params.y_ticks.into(), "y")?,
        fps: validate_fps(params.fps)?,
        draw_per_tick: validate_draw_count_per_frame(params.draw_count_per_frame)?,
        x_formatter: params.x_label_formatter()?,
        y_formatter: params.y_label_formatter()?,
    })
}
