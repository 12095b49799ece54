//! Trigger with a deny-list.

use crate::scheduler::Behavioral;
use bp_model::{BPEvent, RestrictedTriggerError, SnapshotMessage, TriggerError};
use std::sync::Arc;

/// A trigger that refuses a fixed set of event types.
///
/// Refused events never reach the scheduler. The refusal is returned to
/// the caller, logged, and reported to snapshot listeners as a
/// [`SnapshotMessage::RestrictedTriggerError`]. An empty set refuses
/// nothing.
#[derive(Debug, Clone)]
pub struct RestrictedTrigger {
    scheduler: Behavioral,
    restricted: Arc<[String]>,
}

impl RestrictedTrigger {
    pub(crate) fn new<I, S>(scheduler: Behavioral, restricted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scheduler,
            restricted: restricted.into_iter().map(Into::into).collect(),
        }
    }

    /// The refused event types, in declaration order.
    pub fn restricted(&self) -> &[String] {
        &self.restricted
    }

    /// Inject `event` unless its type is restricted.
    pub fn trigger(&self, event: impl Into<BPEvent>) -> Result<(), TriggerError> {
        let event = event.into();
        if !self.restricted.contains(&event.event_type) {
            self.scheduler.trigger(event);
            return Ok(());
        }

        let err = TriggerError::Restricted {
            event_type: event.event_type.clone(),
            restricted: self.restricted.to_vec(),
        };
        tracing::warn!(event_type = %event.event_type, "restricted trigger refused event");
        self.scheduler
            .inner
            .report(SnapshotMessage::RestrictedTriggerError(RestrictedTriggerError {
                event_type: event.event_type,
                detail: event.detail,
                error: err.to_string(),
            }));
        Err(err)
    }
}
