#![deny(missing_docs)]
//! Wiring for self-contained behavioral programs.
//!
//! A [`Program`] owns one scheduler and everything attached to it. It is
//! built from a [`ProgramConfig`] and a definition closure: the closure
//! receives a [`ProgramContext`], registers threads and any extra
//! subscriptions through it, and returns the feedback [`Handlers`] for the
//! program. What comes back is a handle whose [`Program::trigger`] is the
//! *public* entry point:
//!
//! | Entry point | Accepts |
//! |-------------|---------|
//! | [`ProgramTrigger::trigger`] (inside the program) | any event |
//! | [`Program::trigger`] | public, unrestricted event types |
//! | [`Program::trigger_value`] | untyped JSON that passes [`is_bp_event`](bp_model::is_bp_event), then as above |
//!
//! Every subscription made through the context, plus the feedback
//! subscription itself, lands in one disconnect set that
//! [`Program::disconnect`] tears down.
//!
//! [`Handlers`]: bp_engine::Handlers

mod config;
mod context;
mod program;

pub use config::ProgramConfig;
pub use context::{ProgramContext, ProgramTrigger};
pub use program::Program;
