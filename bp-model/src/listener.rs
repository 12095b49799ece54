//! Listeners: the matching rule shared by `wait_for`, `block`, and `interrupt`.

use crate::event::BPEvent;
use std::fmt;
use std::sync::Arc;

type Predicate = Arc<dyn Fn(&BPEvent) -> bool + Send + Sync>;

/// Matches an event either by exact type or by an arbitrary predicate.
#[derive(Clone)]
pub enum Listener {
    /// Matches events whose type equals this string.
    Type(String),
    /// Matches events for which the predicate returns true.
    Predicate(Predicate),
}

impl Listener {
    /// Build a predicate listener.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&BPEvent) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }

    /// A listener that matches every event.
    pub fn any() -> Self {
        Self::predicate(|_| true)
    }

    /// Test the listener against an event.
    pub fn matches(&self, event: &BPEvent) -> bool {
        match self {
            Self::Type(t) => *t == event.event_type,
            Self::Predicate(p) => p(event),
        }
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(t) => f.debug_tuple("Type").field(t).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<&str> for Listener {
    fn from(s: &str) -> Self {
        Self::Type(s.to_owned())
    }
}

impl From<String> for Listener {
    fn from(s: String) -> Self {
        Self::Type(s)
    }
}

/// Zero or more listeners combined with an implicit OR.
#[derive(Debug, Clone, Default)]
pub struct Listeners(Vec<Listener>);

impl Listeners {
    /// An empty set. Matches nothing.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// True if any listener matches the event.
    pub fn matches(&self, event: &BPEvent) -> bool {
        self.0.iter().any(|l| l.matches(event))
    }

    /// First listener matching the event, if any.
    pub fn find(&self, event: &BPEvent) -> Option<&Listener> {
        self.0.iter().find(|l| l.matches(event))
    }

    /// True if there are no listeners.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of listeners.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate the listeners in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Listener> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Listeners {
    type Item = &'a Listener;
    type IntoIter = std::slice::Iter<'a, Listener>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Listener> for Listeners {
    fn from(l: Listener) -> Self {
        Self(vec![l])
    }
}

impl From<&str> for Listeners {
    fn from(s: &str) -> Self {
        Self(vec![Listener::from(s)])
    }
}

impl From<String> for Listeners {
    fn from(s: String) -> Self {
        Self(vec![Listener::from(s)])
    }
}

impl From<Vec<Listener>> for Listeners {
    fn from(v: Vec<Listener>) -> Self {
        Self(v)
    }
}

impl From<Vec<&str>> for Listeners {
    fn from(v: Vec<&str>) -> Self {
        Self(v.into_iter().map(Listener::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Listeners {
    fn from(v: [&str; N]) -> Self {
        Self(v.into_iter().map(Listener::from).collect())
    }
}

impl FromIterator<Listener> for Listeners {
    fn from_iter<I: IntoIterator<Item = Listener>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
