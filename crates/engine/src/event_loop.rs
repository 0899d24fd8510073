//! The boundary between a loop and the handlers that observe it.

use crate::events::EventTrigger;
use crate::state::State;

/// A callback fired with mutable access to the loop state.
pub type Handler = Box<dyn FnMut(&mut State) + Send>;

/// Anything that owns a [`State`] and fires handlers at [`EventTrigger`]s.
///
/// Handlers registered for the same event fire in registration order.
pub trait EventLoop {
    fn state(&self) -> &State;

    fn state_mut(&mut self) -> &mut State;

    fn add_event_handler(&mut self, trigger: EventTrigger, handler: Handler);
}
