//! Binding schedulers to an [`EventLoop`].

use stateparam_engine::{EventLoop, EventTrigger, State};

use crate::error::{Result, SchedulerError};
use crate::scheduler::StateParamScheduler;
use crate::value_fn::ValueFunction;

impl<F: ValueFunction + 'static> StateParamScheduler<F> {
    /// Fire this scheduler once per occurrence of `trigger` on `event_loop`.
    ///
    /// The parameter is declared in the loop state right away (unset until
    /// the first firing), so a second scheduler attached under the same name
    /// fails here instead of silently overwriting values during the run.
    pub fn attach<L, T>(&self, event_loop: &mut L, trigger: T) -> Result<()>
    where
        L: EventLoop + ?Sized,
        T: Into<EventTrigger>,
    {
        let trigger = trigger.into();
        let state = event_loop.state_mut();
        if !state.declare_param(self.param_name()) {
            return Err(SchedulerError::NameConflict {
                name: self.param_name().to_string(),
            });
        }
        if self.save_history() {
            state.enable_history(self.param_name());
        }

        let handle = self.clone();
        event_loop.add_event_handler(
            trigger,
            Box::new(move |state: &mut State| {
                handle.step(state);
            }),
        );
        tracing::debug!(
            param = %self.param_name(),
            %trigger,
            save_history = self.save_history(),
            "Scheduler attached"
        );
        Ok(())
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
