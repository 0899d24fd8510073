//! # stateparam-engine — The Event Loop
//!
//! The loop-side half of state parameter scheduling:
//!
//! * **[`State`]** — mutable loop state: counters, named parameters and
//!   their recorded history.
//! * **[`Events`]** / **[`EventTrigger`]** — the trigger points handlers
//!   subscribe to, optionally filtered (`every(n)`, `once(n)`).
//! * **[`EventLoop`]** — the boundary schedulers attach to.
//! * **[`Engine`]** — a minimal reference loop that iterates a slice of
//!   batches for a number of epochs and fires events along the way.

pub mod engine;
pub mod error;
pub mod event_loop;
pub mod events;
pub mod state;

pub use engine::Engine;
pub use error::{EngineError, Result};
pub use event_loop::{EventLoop, Handler};
pub use events::{EventTrigger, Events};
pub use state::State;
