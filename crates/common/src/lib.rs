//! # stateparam-common — Shared Configuration
//!
//! * **[`ScheduleConfig`]** — a schedule file (loop length + schedulers), JSON.
//! * **[`SchedulerConfig`]** — one scheduler: parameter name, trigger, history flag.
//! * **[`ValueFnConfig`]** — value function arguments, tagged by `kind`.

pub mod config;

pub use config::{ScheduleConfig, SchedulerConfig, ValueFnConfig};
