//! Thread identities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a thread inside one scheduler.
///
/// Registered threads are named by the caller. Threads created by an
/// external trigger are anonymous: they carry a per-scheduler sequence
/// number so two triggers of the same event type never collide.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadId {
    /// A long-lived thread registered under a name.
    Named(String),
    /// An ephemeral thread created by a trigger.
    Trigger {
        /// Sequence number, unique within one scheduler.
        seq: u64,
        /// Type of the injected event.
        event_type: String,
    },
}

impl ThreadId {
    /// Create a named ID.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// True for trigger-created threads.
    pub fn is_trigger(&self) -> bool {
        matches!(self, Self::Trigger { .. })
    }

    /// The name, for registered threads.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(n) => Some(n),
            Self::Trigger { .. } => None,
        }
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => write!(f, "{n}"),
            Self::Trigger { seq, event_type } => write!(f, "trigger({event_type})#{seq}"),
        }
    }
}

impl From<&str> for ThreadId {
    fn from(s: &str) -> Self {
        Self::Named(s.to_owned())
    }
}

impl From<String> for ThreadId {
    fn from(s: String) -> Self {
        Self::Named(s)
    }
}
