//! State parameter scheduler: writes `value_fn(event_index)` into the loop
//! state under a fixed name every time it fires.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use stateparam_engine::State;

use crate::error::Result;
use crate::snapshot::StateDict;
use crate::value_fn::{Exponential, Lambda, MultiStep, PiecewiseLinear, StepDecay, ValueFunction};

// ── Scheduler ───────────────────────────────────────────────────────────────

/// Drives one named parameter of a loop's [`State`].
///
/// Clones are handles to the same scheduler: they share the event counter,
/// which is how the handler registered by
/// [`attach`](StateParamScheduler::attach) and the caller's copy stay in
/// step for [`state_dict`](StateParamScheduler::state_dict).
pub struct StateParamScheduler<F> {
    param_name: String,
    save_history: bool,
    value_fn: Arc<F>,
    event_index: Arc<AtomicUsize>,
}

pub type ExpStateScheduler = StateParamScheduler<Exponential>;
pub type StepStateScheduler = StateParamScheduler<StepDecay>;
pub type MultiStepStateScheduler = StateParamScheduler<MultiStep>;
pub type PiecewiseLinearStateScheduler = StateParamScheduler<PiecewiseLinear>;
pub type LambdaStateScheduler<L> = StateParamScheduler<Lambda<L>>;

impl<F: ValueFunction> StateParamScheduler<F> {
    pub fn new(param_name: impl Into<String>, value_fn: F, save_history: bool) -> Self {
        Self {
            param_name: param_name.into(),
            save_history,
            value_fn: Arc::new(value_fn),
            event_index: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn param_name(&self) -> &str {
        &self.param_name
    }

    pub fn save_history(&self) -> bool {
        self.save_history
    }

    pub fn value_fn(&self) -> &F {
        &self.value_fn
    }

    /// Number of times this scheduler has fired.
    pub fn event_index(&self) -> usize {
        self.event_index.load(Ordering::Relaxed)
    }

    /// Value at the current event index, without firing.
    pub fn current_value(&self) -> f64 {
        self.value_fn.value(self.event_index())
    }

    /// Fire once: advance the counter, then write the new value (and record
    /// it when history is on). The first firing therefore uses index 1.
    pub fn step(&self, state: &mut State) -> f64 {
        let event_index = self.event_index.fetch_add(1, Ordering::Relaxed) + 1;
        let value = self.value_fn.value(event_index);

        state.set_param(&self.param_name, value);
        if self.save_history {
            state.push_history(&self.param_name, value);
        }
        tracing::trace!(param = %self.param_name, event_index, value, "State parameter updated");
        value
    }

    /// Advance the counter without touching any state, returning the value.
    pub(crate) fn advance(&self) -> f64 {
        let event_index = self.event_index.fetch_add(1, Ordering::Relaxed) + 1;
        self.value_fn.value(event_index)
    }

    /// A new scheduler with the same name and value function but its own
    /// counter, starting from zero.
    pub(crate) fn detached(&self) -> Self {
        Self {
            param_name: self.param_name.clone(),
            save_history: false,
            value_fn: Arc::clone(&self.value_fn),
            event_index: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Snapshot of the counter. Value-function arguments are not included.
    pub fn state_dict(&self) -> StateDict {
        StateDict {
            event_index: self.event_index(),
        }
    }

    /// Restore the counter from a snapshot.
    pub fn load_state_dict(&self, state_dict: &StateDict) {
        self.event_index
            .store(state_dict.event_index, Ordering::Relaxed);
    }
}

// ── Convenience constructors ────────────────────────────────────────────────

impl ExpStateScheduler {
    pub fn exponential(
        param_name: impl Into<String>,
        initial_value: f64,
        gamma: f64,
        save_history: bool,
    ) -> Self {
        Self::new(param_name, Exponential::new(initial_value, gamma), save_history)
    }
}

impl StepStateScheduler {
    pub fn step_decay(
        param_name: impl Into<String>,
        initial_value: f64,
        gamma: f64,
        step_size: usize,
        save_history: bool,
    ) -> Result<Self> {
        let value_fn = StepDecay::new(initial_value, gamma, step_size)?;
        Ok(Self::new(param_name, value_fn, save_history))
    }
}

impl MultiStepStateScheduler {
    pub fn multi_step(
        param_name: impl Into<String>,
        initial_value: f64,
        gamma: f64,
        milestones: Vec<usize>,
        save_history: bool,
    ) -> Self {
        Self::new(
            param_name,
            MultiStep::new(initial_value, gamma, milestones),
            save_history,
        )
    }
}

impl PiecewiseLinearStateScheduler {
    pub fn piecewise_linear(
        param_name: impl Into<String>,
        milestones_values: Vec<(usize, f64)>,
        save_history: bool,
    ) -> Result<Self> {
        let value_fn = PiecewiseLinear::new(milestones_values)?;
        Ok(Self::new(param_name, value_fn, save_history))
    }
}

impl<L> LambdaStateScheduler<L>
where
    L: Fn(usize) -> f64 + Send + Sync,
{
    pub fn lambda(param_name: impl Into<String>, f: L, save_history: bool) -> Self {
        Self::new(param_name, Lambda::new(f), save_history)
    }
}

// ── Trait impls ─────────────────────────────────────────────────────────────

impl<F> Clone for StateParamScheduler<F> {
    fn clone(&self) -> Self {
        Self {
            param_name: self.param_name.clone(),
            save_history: self.save_history,
            value_fn: Arc::clone(&self.value_fn),
            event_index: Arc::clone(&self.event_index),
        }
    }
}

impl<F> fmt::Debug for StateParamScheduler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateParamScheduler")
            .field("param_name", &self.param_name)
            .field("save_history", &self.save_history)
            .field("value_fn", &std::any::type_name::<F>())
            .field("event_index", &self.event_index.load(Ordering::Relaxed))
            .finish()
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
