use thiserror::Error;

/// Errors raised by scheduler construction, attachment and snapshots.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SchedulerError {
    /// An argument has the wrong shape or type.
    #[error("{0}")]
    InvalidType(String),

    /// An argument has the right type but an unusable value.
    #[error("{0}")]
    InvalidValue(String),

    #[error(
        "Attribute: '{name}' is already defined in the engine state. This may be a conflict \
         between multiple state parameter schedulers. Please choose another name."
    )]
    NameConflict { name: String },

    #[error("this method requires the `{dependency}` feature to be enabled")]
    MissingDependency { dependency: &'static str },

    #[error("required state attribute '{name}' is absent from the provided state dict")]
    MissingStateAttribute { name: String },

    #[error("invalid state dict: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl SchedulerError {
    /// Type or value error in a constructor argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidType(_) | Self::InvalidValue(_))
    }
}

pub type Result<T> = std::result::Result<T, SchedulerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dependency_names_the_feature() {
        let err = SchedulerError::MissingDependency { dependency: "plot" };
        assert_eq!(
            err.to_string(),
            "this method requires the `plot` feature to be enabled"
        );
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn conflict_message_names_the_attribute() {
        let err = SchedulerError::NameConflict {
            name: "lr".to_string(),
        };
        assert!(err.to_string().starts_with("Attribute: 'lr' is already defined"));
    }
}
