//! Error types for each boundary.
//!
//! The scheduler itself has no error type: it never fails on its own.
//! These errors belong to the edges around it.

use thiserror::Error;

/// Untyped input that is not a valid event.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EventError {
    /// The value is not an object with a string `type` field.
    #[error("malformed event: {0}")]
    Malformed(String),

    /// The value looked like an event but failed to decode.
    #[error("event decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors returned by feedback handlers. These are logged and reported
/// to snapshot listeners; they do NOT stop the scheduler.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The handler failed.
    #[error("{0}")]
    Failed(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
    /// Shorthand for [`HandlerError::Failed`].
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

/// An event was refused at an injection point.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TriggerError {
    /// The event type is not on the public list.
    #[error("event type \"{event_type}\" is not public")]
    NotPublic {
        /// Refused event type.
        event_type: String,
    },

    /// The event type is in the restricted set.
    #[error("Event type \"{}\" is in the restricted set: [{}]", .event_type, .restricted.join(", "))]
    Restricted {
        /// Refused event type.
        event_type: String,
        /// The full restricted set, in declaration order.
        restricted: Vec<String>,
    },

    /// Untyped input failed validation.
    #[error(transparent)]
    Malformed(#[from] EventError),
}

/// Program definition errors.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProgramError {
    /// The configuration is inconsistent.
    #[error("invalid program config: {0}")]
    InvalidConfig(String),

    /// The configuration text failed to parse.
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}
