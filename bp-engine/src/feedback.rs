//! Feedback: side effects keyed by selected event type.
//!
//! Handlers run after selection and never feed back into it. The scheduler
//! does not wait on them: a synchronous handler runs inline in the publish
//! loop, an async handler is spawned and left to finish on its own.

use crate::lock;
use crate::publisher::Disconnect;
use crate::scheduler::Inner;
use bp_model::{BPEvent, FeedbackError, HandlerError, SnapshotMessage};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Weak};

/// Future returned by an async handler.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send>>;

type SyncHandler = Arc<dyn Fn(Value) -> Result<(), HandlerError> + Send + Sync>;
type AsyncHandler = Arc<dyn Fn(Value) -> HandlerFuture + Send + Sync>;

#[derive(Clone)]
enum Handler {
    Sync(SyncHandler),
    Async(AsyncHandler),
}

/// Map from event type to the handler that receives its detail.
///
/// Each handler receives the selected event's detail, or an empty JSON
/// object if it has none.
#[derive(Clone, Default)]
pub struct Handlers {
    map: HashMap<String, Handler>,
}

impl Handlers {
    /// An empty handler map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a synchronous handler. Replaces any handler for the type.
    pub fn on<F>(mut self, event_type: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.map.insert(event_type.into(), Handler::Sync(Arc::new(f)));
        self
    }

    /// Register an async handler. Its future is spawned on the current
    /// tokio runtime and never awaited by the scheduler.
    pub fn on_async<F, Fut>(mut self, event_type: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        let handler: AsyncHandler = Arc::new(move |detail| -> HandlerFuture { Box::pin(f(detail)) });
        self.map.insert(event_type.into(), Handler::Async(handler));
        self
    }

    /// Add every handler of `other`, replacing on conflict.
    pub fn merge(mut self, other: Handlers) -> Self {
        self.map.extend(other.map);
        self
    }

    /// True if a handler is registered for the type.
    pub fn contains(&self, event_type: &str) -> bool {
        self.map.contains_key(event_type)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.map.keys().collect();
        types.sort();
        f.debug_struct("Handlers").field("types", &types).finish()
    }
}

pub(crate) fn subscribe(inner: &Arc<Inner>, handlers: Handlers) -> Disconnect {
    let scheduler = Arc::downgrade(inner);
    let id = inner.feedback.subscribe(Arc::new(move |event: &BPEvent| {
        deliver(&handlers, event, &scheduler)
    }));
    let scheduler = Arc::downgrade(inner);
    Disconnect::new(move || {
        if let Some(inner) = scheduler.upgrade() {
            inner.feedback.unsubscribe(id);
        }
    })
}

fn deliver(handlers: &Handlers, event: &BPEvent, scheduler: &Weak<Inner>) {
    let Some(handler) = handlers.map.get(&event.event_type) else {
        return;
    };
    let detail = event.detail_or_default();
    match handler {
        Handler::Sync(f) => {
            if let Err(err) = f(detail) {
                report_failure(scheduler, event, &err.to_string());
            }
        }
        Handler::Async(f) => match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let fut = f(detail);
                let scheduler = scheduler.clone();
                let event = event.clone();
                runtime.spawn(async move {
                    if let Err(err) = fut.await {
                        report_failure(&scheduler, &event, &err.to_string());
                    }
                });
            }
            Err(_) => report_failure(scheduler, event, "no async runtime available for handler"),
        },
    }
}

fn report_failure(scheduler: &Weak<Inner>, event: &BPEvent, error: &str) {
    tracing::warn!(event_type = %event.event_type, error, "feedback handler failed");
    let Some(inner) = scheduler.upgrade() else {
        return;
    };
    // Skip building the message when nobody listens.
    if lock(&inner.snapshot).is_none() {
        return;
    }
    inner.report(SnapshotMessage::FeedbackError(FeedbackError {
        event_type: event.event_type.clone(),
        detail: event.detail.clone(),
        error: error.to_owned(),
    }));
}
