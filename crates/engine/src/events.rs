//! Event kinds fired by the loop and filtered triggers built from them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::state::State;

/// Trigger points of a training loop, in the order they fire within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Events {
    Started,
    EpochStarted,
    IterationStarted,
    IterationCompleted,
    EpochCompleted,
    Completed,
}

impl Events {
    pub const ALL: [Events; 6] = [
        Events::Started,
        Events::EpochStarted,
        Events::IterationStarted,
        Events::IterationCompleted,
        Events::EpochCompleted,
        Events::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::EpochStarted => "epoch_started",
            Self::IterationStarted => "iteration_started",
            Self::IterationCompleted => "iteration_completed",
            Self::EpochCompleted => "epoch_completed",
            Self::Completed => "completed",
        }
    }

    /// Whether this event is counted by `iteration` rather than `epoch`.
    pub fn is_iteration_event(&self) -> bool {
        matches!(self, Self::IterationStarted | Self::IterationCompleted)
    }

    /// Fire only when the event's counter is a multiple of `n`.
    pub fn every(self, n: usize) -> Result<EventTrigger, EngineError> {
        if n == 0 {
            return Err(EngineError::InvalidEvery(n));
        }
        Ok(EventTrigger {
            event: self,
            filter: EventFilter::Every(n),
        })
    }

    /// Fire only when the event's counter equals `n`.
    pub fn once(self, n: usize) -> EventTrigger {
        EventTrigger {
            event: self,
            filter: EventFilter::Once(n),
        }
    }
}

impl fmt::Display for Events {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Events {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| EngineError::UnknownEvent(s.to_string()))
    }
}

// ── Triggers ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventFilter {
    Always,
    Every(usize),
    Once(usize),
}

/// An event kind plus an optional filter on the event's counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventTrigger {
    event: Events,
    filter: EventFilter,
}

impl EventTrigger {
    pub fn event(&self) -> Events {
        self.event
    }

    /// Does this trigger fire for `event` given the loop's current counters?
    pub fn fires(&self, event: Events, state: &State) -> bool {
        if event != self.event {
            return false;
        }
        let counter = state.event_counter(event);
        match self.filter {
            EventFilter::Always => true,
            EventFilter::Every(n) => counter % n == 0,
            EventFilter::Once(n) => counter == n,
        }
    }
}

impl From<Events> for EventTrigger {
    fn from(event: Events) -> Self {
        Self {
            event,
            filter: EventFilter::Always,
        }
    }
}

impl fmt::Display for EventTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.filter {
            EventFilter::Always => write!(f, "{}", self.event),
            EventFilter::Every(n) => write!(f, "{}(every={n})", self.event),
            EventFilter::Once(n) => write!(f, "{}(once={n})", self.event),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
