//! FeedbackRecorder: records every selected event of the watched types.

use crate::feedback::Handlers;
use crate::lock;
use crate::publisher::Disconnect;
use crate::scheduler::Behavioral;
use bp_model::BPEvent;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Records selected events, in selection order.
///
/// Feedback handlers only see an event's detail, so the recorder stores the
/// watched type alongside it. Use [`FeedbackRecorder::types`] for the
/// common case of checking an event trace.
pub struct FeedbackRecorder {
    events: Arc<Mutex<Vec<BPEvent>>>,
    disconnect: Mutex<Option<Disconnect>>,
}

impl FeedbackRecorder {
    /// Subscribe to `bp`, recording every selected event whose type is in
    /// `event_types`.
    pub fn attach<I, S>(bp: &Behavioral, event_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut handlers = Handlers::new();
        for event_type in event_types {
            let event_type = event_type.into();
            let log = Arc::clone(&events);
            let recorded_type = event_type.clone();
            handlers = handlers.on(event_type, move |detail: Value| {
                lock(&log).push(BPEvent::new(recorded_type.clone()).with_detail(detail));
                Ok(())
            });
        }
        Self {
            events,
            disconnect: Mutex::new(Some(bp.use_feedback(handlers))),
        }
    }

    /// Every recorded event.
    pub fn events(&self) -> Vec<BPEvent> {
        lock(&self.events).clone()
    }

    /// The recorded event types.
    pub fn types(&self) -> Vec<String> {
        lock(&self.events)
            .iter()
            .map(|e| e.event_type.clone())
            .collect()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        lock(&self.events).clear();
    }

    /// Stop recording. Later calls do nothing.
    pub fn detach(&self) {
        if let Some(disconnect) = lock(&self.disconnect).take() {
            disconnect.disconnect();
        }
    }
}

impl std::fmt::Debug for FeedbackRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackRecorder")
            .field("events", &lock(&self.events).len())
            .finish()
    }
}
