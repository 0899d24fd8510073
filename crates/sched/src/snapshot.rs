//! Scheduler snapshots: `{"event_index": <int>}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SchedulerError};

/// Counter snapshot produced by `state_dict` and consumed by `load_state_dict`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateDict {
    pub event_index: usize,
}

impl StateDict {
    const EVENT_INDEX: &'static str = "event_index";

    pub fn to_json(&self) -> Value {
        serde_json::json!({ "event_index": self.event_index })
    }

    /// Parse a snapshot, naming the missing key when it is absent.
    pub fn from_json(value: &Value) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| {
            SchedulerError::InvalidType(format!(
                "Argument state_dict should be a mapping, but given {value}"
            ))
        })?;
        if !map.contains_key(Self::EVENT_INDEX) {
            return Err(SchedulerError::MissingStateAttribute {
                name: Self::EVENT_INDEX.to_string(),
            });
        }
        Ok(serde_json::from_value(value.clone())?)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
