//! # stateparam-sched — State Parameter Schedulers
//!
//! Schedulers that write a named scalar into an event loop's
//! [`State`](stateparam_engine::State) every time a chosen event fires.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`value_fn`] | `Exponential`, `StepDecay`, `MultiStep`, `PiecewiseLinear`, `Lambda` |
//! | [`scheduler`] | `StateParamScheduler` and per-kind aliases |
//! | [`attach`] | binding a scheduler to an `EventLoop` |
//! | [`snapshot`] | `StateDict` (`{"event_index": n}`) |
//! | [`simulate`] / [`chart`] | standalone simulation, `Chart`, `TextChart` (feature `plot`) |
//! | [`factory`] | schedulers from `SchedulerConfig` |
//!
//! The `plot` feature is on by default. The fallback that reports the
//! missing feature is tested with
//! `cargo test -p stateparam-sched --no-default-features`.
//!
//! ```no_run
//! use stateparam_engine::{Engine, Events, State};
//! use stateparam_sched::PiecewiseLinearStateScheduler;
//!
//! let mut engine = Engine::new(|_: &mut State, _: &u32| {});
//! let sched = PiecewiseLinearStateScheduler::piecewise_linear(
//!     "pwlinear_scheduled_param",
//!     vec![(10, 0.0), (20, 10.0)],
//!     true,
//! )?;
//! sched.attach(&mut engine, Events::EpochCompleted)?;
//! engine.run(&[0; 8], 30)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod attach;
pub mod chart;
pub mod error;
pub mod factory;
pub mod scheduler;
pub mod simulate;
pub mod snapshot;
pub mod value_fn;

// ── Public re-exports ───────────────────────────────────────────────────────

#[cfg(feature = "plot")]
pub use chart::TextChart;
pub use chart::Chart;
pub use error::{Result, SchedulerError};
pub use factory::{
    attach_from_config, build_scheduler, build_value_fn, trigger_for, DynStateScheduler,
};
pub use scheduler::{
    ExpStateScheduler, LambdaStateScheduler, MultiStepStateScheduler,
    PiecewiseLinearStateScheduler, StateParamScheduler, StepStateScheduler,
};
pub use snapshot::StateDict;
pub use value_fn::{Exponential, Lambda, MultiStep, PiecewiseLinear, StepDecay, ValueFunction};
