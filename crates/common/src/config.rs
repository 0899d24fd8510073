//! Schedule configuration.
//!
//! Serialised as JSON. Every optional field has a default so a file only
//! needs the scheduler list; a minimal scheduler entry is its
//! `param_name`, `kind` and the value-function arguments.

use serde::{Deserialize, Serialize};
use stateparam_engine::Events;

/// A whole schedule file: loop length plus the schedulers to attach.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Epochs for `stateparam run`.
    #[serde(default = "default_max_epochs")]
    pub max_epochs: usize,
    /// Batches per epoch for `stateparam run`.
    #[serde(default = "default_epoch_length")]
    pub epoch_length: usize,
    #[serde(default)]
    pub schedulers: Vec<SchedulerConfig>,
}

/// One scheduler: which parameter, when it fires, how its value evolves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub param_name: String,
    /// Record every emitted value in the state's history.
    #[serde(default)]
    pub save_history: bool,
    /// Trigger point the scheduler is attached to.
    #[serde(default = "default_event")]
    pub event: Events,
    /// Only fire on every n-th occurrence of `event`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub every: Option<usize>,
    #[serde(flatten)]
    pub value_fn: ValueFnConfig,
}

/// Value function arguments, tagged by `kind`.
///
/// `milestones_values` is kept as raw JSON so malformed lists are reported
/// by the piecewise-linear constructor with a precise message rather than
/// as a generic deserialisation failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueFnConfig {
    Exponential {
        initial_value: f64,
        gamma: f64,
    },
    Step {
        initial_value: f64,
        gamma: f64,
        step_size: usize,
    },
    MultiStep {
        initial_value: f64,
        gamma: f64,
        milestones: Vec<usize>,
    },
    PiecewiseLinear {
        #[serde(default)]
        milestones_values: serde_json::Value,
    },
}

// ── Default value functions ─────────────────────────────────────────────────

fn default_max_epochs() -> usize {
    30
}
fn default_epoch_length() -> usize {
    8
}
fn default_event() -> Events {
    Events::EpochCompleted
}

// ── Impl ────────────────────────────────────────────────────────────────────

impl Default for ScheduleConfig {
    /// A small example schedule, written out by the CLI when no config exists.
    fn default() -> Self {
        Self {
            max_epochs: 30,
            epoch_length: 8,
            schedulers: vec![
                SchedulerConfig {
                    param_name: "exp_scheduled_param".to_string(),
                    save_history: true,
                    event: Events::EpochCompleted,
                    every: None,
                    value_fn: ValueFnConfig::Exponential {
                        initial_value: 10.0,
                        gamma: 0.99,
                    },
                },
                SchedulerConfig {
                    param_name: "pwlinear_scheduled_param".to_string(),
                    save_history: true,
                    event: Events::EpochCompleted,
                    every: None,
                    value_fn: ValueFnConfig::PiecewiseLinear {
                        milestones_values: serde_json::json!([[10, 0.0], [20, 10.0]]),
                    },
                },
            ],
        }
    }
}

impl ScheduleConfig {
    /// Save config to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load config from a JSON file.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }
}

impl ValueFnConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Exponential { .. } => "exponential",
            Self::Step { .. } => "step",
            Self::MultiStep { .. } => "multi_step",
            Self::PiecewiseLinear { .. } => "piecewise_linear",
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
