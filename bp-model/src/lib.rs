//! # bp-model: vocabulary for behavioral programs
//!
//! This crate defines the values every other part of a behavioral program
//! speaks in. It has no scheduling logic of its own.
//!
//! ## The Vocabulary
//!
//! | Concept | Types | What it is |
//! |---------|-------|------------|
//! | Event | [`BPEvent`] | A `type` string plus an opaque JSON `detail` |
//! | Listener | [`Listener`], [`Listeners`] | Exact type match or predicate over an event |
//! | Synchronization point | [`Idioms`], [`Request`], [`EventTemplate`] | What a thread requests, waits for, blocks, and is interrupted by |
//! | Identity | [`ThreadId`] | Named (registered) or anonymous (triggered) threads |
//! | Diagnostics | [`SnapshotMessage`], [`SelectionBid`] | What a snapshot listener receives |
//!
//! ## Boundary validation
//!
//! Untyped input (a message from another context, a decoded network frame)
//! must pass [`is_bp_event`] before it is turned into a [`BPEvent`] and
//! injected into a scheduler. [`BPEvent::from_value`] combines both steps.
//!
//! ## Dependency Notes
//!
//! Event payloads are `serde_json::Value`. A program coordinates UI
//! callbacks, tool calls and cross-instance messages through the same
//! scheduler, and JSON is the common shape of all three.

#![deny(missing_docs)]

pub mod error;
pub mod event;
pub mod id;
pub mod idioms;
pub mod listener;
pub mod snapshot;

// Re-exports for convenience
pub use error::{EventError, HandlerError, ProgramError, TriggerError};
pub use event::{BPEvent, is_bp_event};
pub use id::ThreadId;
pub use idioms::{EventTemplate, Idioms, Request};
pub use listener::{Listener, Listeners};
pub use snapshot::{
    BThreadsWarning, FeedbackError, RestrictedTriggerError, SelectionBid, SnapshotMessage,
};
