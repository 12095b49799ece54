//! Idioms: what a thread declares at a synchronization point.

use crate::event::BPEvent;
use crate::listener::Listeners;
use std::fmt;
use std::sync::Arc;

/// A zero-argument event factory, evaluated each time a request is
/// collected as a candidate.
///
/// Identity matters: two requests built from clones of the same template
/// are the same request for reactivation purposes (see [`EventTemplate::ptr_eq`]).
#[derive(Clone)]
pub struct EventTemplate(Arc<dyn Fn() -> BPEvent + Send + Sync>);

impl EventTemplate {
    /// Wrap a factory.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> BPEvent + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Evaluate the factory.
    pub fn call(&self) -> BPEvent {
        (self.0)()
    }

    /// True if both handles point at the same factory.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for EventTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EventTemplate(..)")
    }
}

/// What a thread asks to happen.
#[derive(Debug, Clone)]
pub enum Request {
    /// A fixed event.
    Event(BPEvent),
    /// An event produced fresh at collection time.
    Template(EventTemplate),
}

impl Request {
    /// The event this request proposes right now.
    pub fn resolve(&self) -> BPEvent {
        match self {
            Self::Event(e) => e.clone(),
            Self::Template(t) => t.call(),
        }
    }

    /// The template, for dynamic requests.
    pub fn template(&self) -> Option<&EventTemplate> {
        match self {
            Self::Event(_) => None,
            Self::Template(t) => Some(t),
        }
    }
}

impl From<BPEvent> for Request {
    fn from(e: BPEvent) -> Self {
        Self::Event(e)
    }
}

impl From<&str> for Request {
    fn from(s: &str) -> Self {
        Self::Event(BPEvent::new(s))
    }
}

impl From<EventTemplate> for Request {
    fn from(t: EventTemplate) -> Self {
        Self::Template(t)
    }
}

/// A synchronization declaration. Every part is optional.
///
/// ```
/// use bp_model::{BPEvent, Idioms};
///
/// let turn = Idioms::new().wait_for("X").block("O");
/// let move_ = Idioms::new().request(BPEvent::new("X"));
/// assert!(turn.request.is_none());
/// assert!(move_.wait_for.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Idioms {
    /// The event this thread proposes.
    pub request: Option<Request>,
    /// Events that resume this thread when selected.
    pub wait_for: Listeners,
    /// Events that may not be selected while this declaration stands.
    pub block: Listeners,
    /// Events that terminate this thread when selected.
    pub interrupt: Listeners,
}

impl Idioms {
    /// An empty declaration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the requested event.
    pub fn request(mut self, request: impl Into<Request>) -> Self {
        self.request = Some(request.into());
        self
    }

    /// Request an event produced by `f` each time the step is considered.
    pub fn request_with<F>(self, f: F) -> Self
    where
        F: Fn() -> BPEvent + Send + Sync + 'static,
    {
        self.request(EventTemplate::new(f))
    }

    /// Set the events this step waits for.
    pub fn wait_for(mut self, listeners: impl Into<Listeners>) -> Self {
        self.wait_for = listeners.into();
        self
    }

    /// Set the events this step blocks.
    pub fn block(mut self, listeners: impl Into<Listeners>) -> Self {
        self.block = listeners.into();
        self
    }

    /// Set the events that interrupt this step.
    pub fn interrupt(mut self, listeners: impl Into<Listeners>) -> Self {
        self.interrupt = listeners.into();
        self
    }

    /// True if `event` satisfies this declaration's request.
    ///
    /// Static requests match by type. Template requests match only the
    /// template that produced the selected event.
    pub fn is_requesting(&self, event: &BPEvent, template: Option<&EventTemplate>) -> bool {
        match &self.request {
            None => false,
            Some(Request::Event(e)) => e.event_type == event.event_type,
            Some(Request::Template(t)) => template.is_some_and(|w| w.ptr_eq(t)),
        }
    }
}
