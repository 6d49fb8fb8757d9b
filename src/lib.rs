//! expanding-chart: progressively animated, auto-scaling line charts.
//!
//! `core` holds the axis calibration and series math, `render` the
//! backend-agnostic draw commands and surfaces, and `api` the `ChartEngine`
//! facade that paces the drawing over host-scheduled frames.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

#[cfg(feature = "gtk4-adapter")]
pub mod platform_gtk;

pub use api::{ChartEngine, ChartEngineConfig, ChartParams, ChartStyle, FrameHost};
pub use error::{ChartError, ChartResult};
