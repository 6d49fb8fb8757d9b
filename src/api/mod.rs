mod compositor;
mod data_controller;
mod engine;
mod engine_accessors;
mod engine_config;
mod engine_snapshot;
mod frame_host;
mod json_contract;
mod label_format;
mod layout;
mod progressive_renderer;
mod validation;

pub use compositor::{Compositor, X_LABEL_ROTATION_DEG};
pub use engine::ChartEngine;
pub use engine_config::{
    AxisTicksConfig, AxisValueKind, ChartEngineConfig, ChartParams, ChartStyle, frame_interval,
};
pub use engine_snapshot::{EngineSnapshot, SeriesSnapshot};
pub use frame_host::{FrameHost, ManualFrameHost};
pub use json_contract::{
    DatasetPayload, ENGINE_SNAPSHOT_JSON_SCHEMA_V1, EngineSnapshotJsonContractV1, IngestInput,
    SeriesPayload, parse_data_key,
};
pub use label_format::{
    DateFormat, EpochUnit, LabelFormatter, LabelFormatterFn, NumberFormat, default_label,
};
pub use progressive_renderer::{ProgressiveRenderer, RenderCursor, RenderPhase, StepOutcome};
