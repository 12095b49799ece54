//! Recorders for testing programs built on the scheduler.
//!
//! Available behind the `test-utils` feature flag.

mod feedback_recorder;
mod snapshot_recorder;

pub use feedback_recorder::FeedbackRecorder;
pub use snapshot_recorder::SnapshotRecorder;
