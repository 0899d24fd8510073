//! Engine: a minimal event-driven training loop.
//!
//! Iterates a slice of batches for a number of epochs, calling the process
//! function once per batch and firing [`Events`] around it. Everything else
//! (schedules, logging, early stopping) is attached as handlers.

use crate::error::{EngineError, Result};
use crate::event_loop::{EventLoop, Handler};
use crate::events::{EventTrigger, Events};
use crate::state::State;

type ProcessFn<B> = Box<dyn FnMut(&mut State, &B) + Send>;

// ── Engine ──────────────────────────────────────────────────────────────────

/// The loop. Owns its [`State`] and the registered handlers.
pub struct Engine<B> {
    process_fn: ProcessFn<B>,
    handlers: Vec<(EventTrigger, Handler)>,
    state: State,
}

impl<B> Engine<B> {
    /// Construct an engine around the per-batch process function.
    pub fn new<F>(process_fn: F) -> Self
    where
        F: FnMut(&mut State, &B) + Send + 'static,
    {
        Self {
            process_fn: Box::new(process_fn),
            handlers: Vec::new(),
            state: State::new(),
        }
    }

    /// Register `handler` to fire whenever `trigger` matches.
    pub fn add_event_handler<T, H>(&mut self, trigger: T, handler: H)
    where
        T: Into<EventTrigger>,
        H: FnMut(&mut State) + Send + 'static,
    {
        self.handlers.push((trigger.into(), Box::new(handler)));
    }

    pub fn num_handlers(&self, event: Events) -> usize {
        self.handlers
            .iter()
            .filter(|(trigger, _)| trigger.event() == event)
            .count()
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// Run over `data` until `max_epochs` epochs have completed.
    ///
    /// A fresh or finished state starts from epoch 0. Otherwise the run
    /// resumes where the previous one stopped, with `max_epochs` replacing
    /// the previous target.
    pub fn run(&mut self, data: &[B], max_epochs: usize) -> Result<&State> {
        if data.is_empty() {
            return Err(EngineError::EmptyData);
        }
        if max_epochs == 0 {
            return Err(EngineError::InvalidMaxEpochs(max_epochs));
        }

        if self.state.max_epochs.is_some() {
            if max_epochs < self.state.epoch {
                return Err(EngineError::MaxEpochsBelowEpoch {
                    max_epochs,
                    epoch: self.state.epoch,
                });
            }
            self.state.max_epochs = Some(max_epochs);
        }

        if self.state.max_epochs.is_none() || self.state.is_done() {
            self.state.epoch = 0;
            self.state.iteration = 0;
            self.state.max_epochs = Some(max_epochs);
            tracing::info!(max_epochs, epoch_length = data.len(), "Engine run starting");
        } else {
            tracing::info!(
                epoch = self.state.epoch,
                max_epochs,
                "Engine run resuming"
            );
        }
        self.state.epoch_length = Some(data.len());
        self.state.clear_terminate();

        self.fire(Events::Started);
        while !self.state.is_done() && !self.state.should_terminate() {
            self.state.epoch += 1;
            self.fire(Events::EpochStarted);

            for batch in data {
                self.state.iteration += 1;
                self.fire(Events::IterationStarted);
                (self.process_fn)(&mut self.state, batch);
                self.fire(Events::IterationCompleted);
                if self.state.should_terminate() {
                    break;
                }
            }
            if self.state.should_terminate() {
                break;
            }

            self.fire(Events::EpochCompleted);
            tracing::debug!(
                epoch = self.state.epoch,
                iteration = self.state.iteration,
                "Epoch completed"
            );
        }
        if self.state.should_terminate() {
            tracing::info!(epoch = self.state.epoch, "Engine terminated early");
        }
        self.fire(Events::Completed);

        Ok(&self.state)
    }

    fn fire(&mut self, event: Events) {
        for (trigger, handler) in self.handlers.iter_mut() {
            if trigger.fires(event, &self.state) {
                handler(&mut self.state);
            }
        }
    }
}

impl<B> EventLoop for Engine<B> {
    fn state(&self) -> &State {
        &self.state
    }

    fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    fn add_event_handler(&mut self, trigger: EventTrigger, handler: Handler) {
        self.handlers.push((trigger, handler));
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
