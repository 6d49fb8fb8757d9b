use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::{DataPoint, SeriesSet};
use crate::error::{ChartError, ChartResult};

use super::EngineSnapshot;

pub const ENGINE_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: EngineSnapshot,
}

impl EngineSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = EngineSnapshotJsonContractV1 {
            schema_version: ENGINE_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Accepts either a bare snapshot or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<EngineSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: EngineSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != ENGINE_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}

/// One entry of `datasets` in the named-series payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetPayload {
    pub color: Option<String>,
    /// `"<prefix><x>": y` pairs in insertion order.
    pub data: IndexMap<String, Value>,
}

/// Named-series payload sent by the host bridge:
/// `{ legend: [name | null, ...], datasets: { name: { color, data } } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesPayload {
    pub legend: Vec<Option<String>>,
    pub datasets: IndexMap<String, DatasetPayload>,
}

/// Parallel name / point / color lists ready for [`SeriesSet::ingest`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestInput {
    pub names: Vec<Option<String>>,
    pub points: Vec<Vec<DataPoint>>,
    pub colors: Vec<Option<String>>,
}

impl IngestInput {
    pub fn into_series_set(self) -> ChartResult<SeriesSet> {
        SeriesSet::ingest(self.names, self.points, &self.colors)
    }
}

impl SeriesPayload {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse series payload: {e}")))
    }

    /// Flattens the payload in legend order.
    ///
    /// Malformed keys and non-numeric values are logged and skipped. A legend
    /// name without a dataset becomes an empty series; a `null` legend entry
    /// stays as a non-drawable placeholder.
    #[must_use]
    pub fn into_ingest_input(self) -> IngestInput {
        let mut input = IngestInput::default();
        let unused = self
            .datasets
            .keys()
            .filter(|key| !self.legend.iter().flatten().any(|name| name == *key))
            .count();

        for name in self.legend {
            let dataset = name
                .as_deref()
                .and_then(|name| self.datasets.get(name))
                .cloned()
                .unwrap_or_default();

            let mut points = Vec::with_capacity(dataset.data.len());
            for (key, value) in dataset.data {
                let Some(x) = parse_data_key(&key) else {
                    warn!(series = ?name, key = %key, "skipping malformed data key");
                    continue;
                };
                let Some(y) = value.as_f64() else {
                    warn!(series = ?name, key = %key, "skipping non-numeric data value");
                    continue;
                };
                points.push(DataPoint::new(x, y));
            }

            input.names.push(name);
            input.points.push(points);
            input.colors.push(dataset.color);
        }

        if unused > 0 {
            debug!(unused, "datasets without a legend entry ignored");
        }
        input
    }
}

/// Parses `"t1700000000"`-style keys: the raw number, or the number after a
/// single leading non-numeric prefix character.
#[must_use]
pub fn parse_data_key(key: &str) -> Option<f64> {
    let key = key.trim();
    if let Some(value) = parse_finite(key) {
        return Some(value);
    }
    let mut chars = key.chars();
    let first = chars.next()?;
    if first.is_ascii_digit() || matches!(first, '-' | '+' | '.') {
        return None;
    }
    parse_finite(chars.as_str())
}

fn parse_finite(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}
