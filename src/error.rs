//! Discord discovery error types.

use std::time::Duration;

use thiserror::Error;

/// Errors reported by discord discovery.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiscordError {
    #[error("Empty input: the time series has no values")]
    EmptyInput,

    #[error("Invalid argument: {name} - {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("Deadline exceeded after {elapsed:?} at candidate position {position}")]
    DeadlineExceeded { elapsed: Duration, position: usize },
}

impl DiscordError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        DiscordError::InvalidArgument {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for discord discovery operations.
pub type Result<T> = std::result::Result<T, DiscordError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_display() {
        assert_eq!(
            DiscordError::EmptyInput.to_string(),
            "Empty input: the time series has no values"
        );
    }

    #[test]
    fn test_invalid_argument_display() {
        let error = DiscordError::invalid("window", "must be smaller than the series length 16");
        assert_eq!(
            error.to_string(),
            "Invalid argument: window - must be smaller than the series length 16"
        );
    }

    #[test]
    fn test_deadline_display_mentions_position() {
        let error = DiscordError::DeadlineExceeded {
            elapsed: Duration::from_millis(5),
            position: 42,
        };
        let msg = error.to_string();
        assert!(msg.contains("5ms"), "unexpected message: {msg}");
        assert!(msg.contains("42"), "unexpected message: {msg}");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + std::error::Error>() {}
        assert_send_sync::<DiscordError>();
    }
}
