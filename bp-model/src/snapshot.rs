//! Diagnostic messages delivered to snapshot listeners.
//!
//! These are projections for visualization and debugging. Nothing in a
//! program should branch on them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One candidate of a super-step, with its relationship to the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionBid {
    /// Requesting thread, rendered with [`ThreadId`](crate::ThreadId)'s `Display`.
    pub thread: String,
    /// Whether the request came from an external trigger.
    pub trigger: bool,
    /// Whether this candidate won the step.
    pub selected: bool,
    /// Requested event type.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Requested event detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
    /// Priority; lower wins.
    pub priority: u32,
    /// First thread whose `block` matches this candidate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_by: Option<String>,
    /// First thread whose `interrupt` matches this candidate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interrupts: Option<String>,
}

/// A feedback handler returned an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackError {
    /// Type of the event being delivered.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Detail of the event being delivered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
    /// Rendered error.
    pub error: String,
}

/// A restricted trigger refused an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestrictedTriggerError {
    /// Type of the refused event.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Detail of the refused event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
    /// Rendered error.
    pub error: String,
}

/// A thread registration replaced an existing thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BThreadsWarning {
    /// Name of the replaced thread.
    pub thread: String,
    /// Human-readable warning.
    pub warning: String,
}

/// Everything a snapshot listener can receive.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SnapshotMessage {
    /// The candidates of one super-step, sorted by ascending priority.
    Selection {
        /// Candidate rows.
        bids: Vec<SelectionBid>,
    },
    /// See [`FeedbackError`].
    FeedbackError(FeedbackError),
    /// See [`RestrictedTriggerError`].
    RestrictedTriggerError(RestrictedTriggerError),
    /// See [`BThreadsWarning`].
    BthreadsWarning(BThreadsWarning),
}

impl SnapshotMessage {
    /// The selection rows, if this is a selection snapshot.
    pub fn bids(&self) -> Option<&[SelectionBid]> {
        match self {
            Self::Selection { bids } => Some(bids),
            _ => None,
        }
    }

    /// The winning row, if this is a selection snapshot.
    pub fn selected(&self) -> Option<&SelectionBid> {
        self.bids()?.iter().find(|b| b.selected)
    }
}
