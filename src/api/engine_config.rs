use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{AxisTicks, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

use super::label_format::{EpochUnit, LabelFormatter, LabelFormatterFn};

/// How raw axis values are turned into label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisValueKind {
    #[default]
    Number,
    Date,
}

/// Wire form of one axis' tick options.
///
/// Supplying `valueMin`/`valueMax` pins that bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AxisTicksConfig {
    pub enabled: bool,
    pub interval: f64,
    pub count_max: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_max: Option<f64>,
}

impl Default for AxisTicksConfig {
    fn default() -> Self {
        Self::from(AxisTicks::default())
    }
}

impl From<AxisTicksConfig> for AxisTicks {
    fn from(config: AxisTicksConfig) -> Self {
        let mut ticks = AxisTicks::new(config.interval, config.count_max).with_enabled(config.enabled);
        if let Some(value_min) = config.value_min {
            ticks = ticks.with_value_min(value_min);
        }
        if let Some(value_max) = config.value_max {
            ticks = ticks.with_value_max(value_max);
        }
        ticks
    }
}

impl From<AxisTicks> for AxisTicksConfig {
    fn from(ticks: AxisTicks) -> Self {
        Self {
            enabled: ticks.enabled,
            interval: ticks.interval,
            count_max: ticks.count_max,
            value_min: ticks.override_value_min.then_some(ticks.value_min),
            value_max: ticks.override_value_max.then_some(ticks.value_max),
        }
    }
}

/// Chart configuration object accepted from the host.
///
/// Label callbacks cannot travel through JSON; attach them with
/// [`ChartParams::with_x_label_formatter`] / [`ChartParams::with_y_label_formatter`].
#[derive(Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartParams {
    pub x_ticks: AxisTicksConfig,
    pub y_ticks: AxisTicksConfig,
    pub x_value_label_enabled: bool,
    pub y_value_label_enabled: bool,
    pub fps: u32,
    pub draw_count_per_frame: u32,
    pub x_type: AxisValueKind,
    pub y_type: AxisValueKind,
    pub x_format: String,
    pub y_format: String,
    pub x_epoch_unit: EpochUnit,
    pub y_epoch_unit: EpochUnit,
    pub date_utc_offset_minutes: i32,
    #[serde(skip)]
    pub x_label_formatter_callback: Option<LabelFormatterFn>,
    #[serde(skip)]
    pub y_label_formatter_callback: Option<LabelFormatterFn>,
}

impl std::fmt::Debug for ChartParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartParams")
            .field("x_ticks", &self.x_ticks)
            .field("y_ticks", &self.y_ticks)
            .field("x_value_label_enabled", &self.x_value_label_enabled)
            .field("y_value_label_enabled", &self.y_value_label_enabled)
            .field("fps", &self.fps)
            .field("draw_count_per_frame", &self.draw_count_per_frame)
            .field("x_type", &self.x_type)
            .field("y_type", &self.y_type)
            .field("x_format", &self.x_format)
            .field("y_format", &self.y_format)
            .field("x_callback", &self.x_label_formatter_callback.is_some())
            .field("y_callback", &self.y_label_formatter_callback.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for ChartParams {
    fn default() -> Self {
        Self {
            x_ticks: AxisTicksConfig::default(),
            y_ticks: AxisTicksConfig::default(),
            x_value_label_enabled: true,
            y_value_label_enabled: false,
            fps: 12,
            draw_count_per_frame: 1,
            x_type: AxisValueKind::Number,
            y_type: AxisValueKind::Number,
            x_format: String::new(),
            y_format: String::new(),
            x_epoch_unit: EpochUnit::Seconds,
            y_epoch_unit: EpochUnit::Seconds,
            date_utc_offset_minutes: 0,
            x_label_formatter_callback: None,
            y_label_formatter_callback: None,
        }
    }
}

impl ChartParams {
    #[must_use]
    pub fn with_x_ticks(mut self, ticks: AxisTicks) -> Self {
        self.x_ticks = ticks.into();
        self
    }

    #[must_use]
    pub fn with_y_ticks(mut self, ticks: AxisTicks) -> Self {
        self.y_ticks = ticks.into();
        self
    }

    #[must_use]
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    #[must_use]
    pub fn with_draw_count_per_frame(mut self, count: u32) -> Self {
        self.draw_count_per_frame = count;
        self
    }

    #[must_use]
    pub fn with_value_labels(mut self, x_enabled: bool, y_enabled: bool) -> Self {
        self.x_value_label_enabled = x_enabled;
        self.y_value_label_enabled = y_enabled;
        self
    }

    #[must_use]
    pub fn with_x_format(mut self, kind: AxisValueKind, format: impl Into<String>) -> Self {
        self.x_type = kind;
        self.x_format = format.into();
        self
    }

    #[must_use]
    pub fn with_y_format(mut self, kind: AxisValueKind, format: impl Into<String>) -> Self {
        self.y_type = kind;
        self.y_format = format.into();
        self
    }

    #[must_use]
    pub fn with_x_label_formatter(
        mut self,
        callback: impl Fn(f64) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.x_label_formatter_callback = Some(std::sync::Arc::new(callback));
        self
    }

    #[must_use]
    pub fn with_y_label_formatter(
        mut self,
        callback: impl Fn(f64) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.y_label_formatter_callback = Some(std::sync::Arc::new(callback));
        self
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse chart params: {e}")))
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize chart params: {e}")))
    }

    /// Resolves the x-axis formatter: an injected callback wins over the
    /// built-in formatter selected by `x_type`/`x_format`.
    pub fn x_label_formatter(&self) -> ChartResult<LabelFormatter> {
        resolve_formatter(
            self.x_label_formatter_callback.as_ref(),
            self.x_type,
            &self.x_format,
            self.x_epoch_unit,
            self.date_utc_offset_minutes,
        )
    }

    pub fn y_label_formatter(&self) -> ChartResult<LabelFormatter> {
        resolve_formatter(
            self.y_label_formatter_callback.as_ref(),
            self.y_type,
            &self.y_format,
            self.y_epoch_unit,
            self.date_utc_offset_minutes,
        )
    }
}

fn resolve_formatter(
    callback: Option<&LabelFormatterFn>,
    kind: AxisValueKind,
    pattern: &str,
    unit: EpochUnit,
    utc_offset_minutes: i32,
) -> ChartResult<LabelFormatter> {
    if let Some(callback) = callback {
        return Ok(LabelFormatter::Custom(callback.clone()));
    }
    match kind {
        AxisValueKind::Number => LabelFormatter::number(pattern),
        AxisValueKind::Date => LabelFormatter::date(pattern, unit, utc_offset_minutes),
    }
}

/// Milliseconds between animation frames for `fps`, truncated like an
/// integer `1000 / fps`.
#[must_use]
pub fn frame_interval(fps: u32) -> Duration {
    Duration::from_millis(u64::from(1000 / fps.max(1)))
}

/// Device metrics and derived drawing sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartStyle {
    pub density: f64,
    pub scaled_density: f64,
    pub grid_color: Color,
    pub axis_color: Color,
    pub label_color: Color,
    pub default_series_color: Color,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::with_density(1.0, 1.0)
    }
}

impl ChartStyle {
    #[must_use]
    pub fn with_density(density: f64, scaled_density: f64) -> Self {
        Self {
            density,
            scaled_density,
            grid_color: Color::GRAY,
            axis_color: Color::BLACK,
            label_color: Color::BLACK,
            default_series_color: Color::BLACK,
        }
    }

    #[must_use]
    pub fn padding_px(&self) -> f64 {
        (3.0 * self.density).trunc()
    }

    #[must_use]
    pub fn axis_label_padding_px(&self) -> f64 {
        self.padding_px()
    }

    #[must_use]
    pub fn label_font_size_px(&self) -> f64 {
        10.0 * self.scaled_density
    }

    #[must_use]
    pub fn series_stroke_width_px(&self) -> f64 {
        2.0 * self.density
    }

    #[must_use]
    pub fn axis_stroke_width_px(&self) -> f64 {
        (1.0 * self.density).trunc().max(1.0)
    }

    #[must_use]
    pub fn grid_stroke_width_px(&self) -> f64 {
        1.0
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.density.is_finite() || self.density <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "density must be finite and > 0".to_owned(),
            ));
        }
        if !self.scaled_density.is_finite() || self.scaled_density <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "scaled density must be finite and > 0".to_owned(),
            ));
        }
        for color in [
            self.grid_color,
            self.axis_color,
            self.label_color,
            self.default_series_color,
        ] {
            color.validate()?;
        }
        Ok(())
    }
}

/// Construction-time options of a [`super::ChartEngine`].
#[derive(Debug, Clone, Default)]
pub struct ChartEngineConfig {
    pub viewport: Viewport,
    pub style: ChartStyle,
    pub params: ChartParams,
}

impl ChartEngineConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: ChartParams) -> Self {
        self.params = params;
        self
    }
}
