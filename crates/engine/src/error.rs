//! Error types for running the event loop.

use thiserror::Error;

/// Errors raised by [`crate::Engine::run`] before any event fires.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    #[error("cannot run on empty data: at least one batch is required")]
    EmptyData,

    #[error("max_epochs should be at least 1, got {0}")]
    InvalidMaxEpochs(usize),

    #[error(
        "max_epochs ({max_epochs}) should be larger than the start epoch defined in the state ({epoch})"
    )]
    MaxEpochsBelowEpoch { max_epochs: usize, epoch: usize },

    #[error("every should be a positive integer, but given {0}")]
    InvalidEvery(usize),

    #[error("unknown event name '{0}'")]
    UnknownEvent(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
