//! Mutable loop state shared by every handler attached to one loop.
//!
//! Scheduled parameters live in an explicit name → value map rather than as
//! ad-hoc fields, and their recorded history in a separate name → values
//! map. A parameter can be *declared* (present, no value yet) before the
//! first firing writes to it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::events::Events;

#[derive(Debug, Clone, Default, Serialize)]
pub struct State {
    /// Epochs started so far in the current run (1-based once running).
    pub epoch: usize,
    /// Iterations started so far, across epochs.
    pub iteration: usize,
    pub max_epochs: Option<usize>,
    pub epoch_length: Option<usize>,
    params: BTreeMap<String, Option<f64>>,
    param_history: Option<BTreeMap<String, Vec<f64>>>,
    #[serde(skip)]
    should_terminate: bool,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter used to filter triggers of `event`.
    pub fn event_counter(&self, event: Events) -> usize {
        if event.is_iteration_event() {
            self.iteration
        } else {
            self.epoch
        }
    }

    /// True when the current run reached `max_epochs`.
    pub fn is_done(&self) -> bool {
        self.max_epochs.is_some_and(|max| self.epoch >= max)
    }

    // ── Parameters ──────────────────────────────────────────────────────────

    pub fn has_param(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Register `name` without a value. Returns `false` if it already existed.
    pub fn declare_param(&mut self, name: &str) -> bool {
        if self.params.contains_key(name) {
            return false;
        }
        self.params.insert(name.to_string(), None);
        true
    }

    /// Current value, `None` if undeclared or not yet written.
    pub fn param(&self, name: &str) -> Option<f64> {
        self.params.get(name).copied().flatten()
    }

    pub fn set_param(&mut self, name: &str, value: f64) {
        match self.params.get_mut(name) {
            Some(slot) => *slot = Some(value),
            None => {
                self.params.insert(name.to_string(), Some(value));
            }
        }
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.params.iter().map(|(k, v)| (k.as_str(), *v))
    }

    // ── History ─────────────────────────────────────────────────────────────

    /// The whole history map; `None` until some parameter enables history.
    pub fn param_history(&self) -> Option<&BTreeMap<String, Vec<f64>>> {
        self.param_history.as_ref()
    }

    pub fn history(&self, name: &str) -> Option<&[f64]> {
        self.param_history
            .as_ref()
            .and_then(|h| h.get(name))
            .map(Vec::as_slice)
    }

    /// Make sure a (possibly empty) history list exists for `name`.
    pub fn enable_history(&mut self, name: &str) {
        self.param_history
            .get_or_insert_with(BTreeMap::new)
            .entry(name.to_string())
            .or_default();
    }

    /// Append to `name`'s history, creating the list on first use.
    pub fn push_history(&mut self, name: &str, value: f64) {
        self.param_history
            .get_or_insert_with(BTreeMap::new)
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    // ── Termination ─────────────────────────────────────────────────────────

    /// Ask the loop to stop after the current iteration.
    pub fn terminate(&mut self) {
        self.should_terminate = true;
    }

    pub fn should_terminate(&self) -> bool {
        self.should_terminate
    }

    pub(crate) fn clear_terminate(&mut self) {
        self.should_terminate = false;
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_param_has_no_value() {
        let mut state = State::new();
        assert!(state.declare_param("lr"));
        assert!(state.has_param("lr"));
        assert_eq!(state.param("lr"), None);
        assert!(!state.declare_param("lr"));

        state.set_param("lr", 0.5);
        assert_eq!(state.param("lr"), Some(0.5));
    }

    #[test]
    fn history_created_on_first_use() {
        let mut state = State::new();
        assert!(state.param_history().is_none());

        state.push_history("w", 1.0);
        state.push_history("w", 2.0);
        assert_eq!(state.history("w"), Some(&[1.0, 2.0][..]));
        assert_eq!(state.history("other"), None);
    }

    #[test]
    fn enable_history_keeps_existing_values() {
        let mut state = State::new();
        state.enable_history("w");
        assert_eq!(state.history("w"), Some(&[][..]));
        state.push_history("w", 3.0);
        state.enable_history("w");
        assert_eq!(state.history("w"), Some(&[3.0][..]));
    }

    #[test]
    fn event_counter_picks_iteration_for_iteration_events() {
        let state = State {
            epoch: 2,
            iteration: 17,
            ..Default::default()
        };
        assert_eq!(state.event_counter(Events::IterationCompleted), 17);
        assert_eq!(state.event_counter(Events::EpochCompleted), 2);
        assert_eq!(state.event_counter(Events::Started), 2);
    }
}
