#![deny(missing_docs)]
//! Thread composition for behavioral programs.
//!
//! A thread is a coroutine that yields one [`Idioms`] per synchronization
//! point and ends when it runs out of steps. Here a coroutine is any
//! `Iterator<Item = Idioms>`; the scheduler resumes it by calling `next()`.
//!
//! [`Rules`] is a thread *factory*: it can be started any number of times,
//! and every start produces an independent coroutine. Two builders cover
//! nearly every thread:
//!
//! - [`step`] wraps one declaration into a one-shot thread.
//! - [`sequence`] concatenates threads; [`repeating`] does the same and
//!   restarts the whole pass according to a [`Repeat`] policy.
//!
//! ```
//! use bp_thread::{Repeat, repeating, step};
//! use bp_model::Idioms;
//!
//! // Alternate X and O forever.
//! let enforce_turns = repeating(
//!     [
//!         step(Idioms::new().wait_for("X").block("O")),
//!         step(Idioms::new().wait_for("O").block("X")),
//!     ],
//!     Repeat::Always,
//! );
//! let mut thread = enforce_turns.start();
//! assert!(thread.next().is_some());
//! ```

use bp_model::Idioms;
use std::fmt;
use std::sync::Arc;

/// A running thread.
pub type Coroutine = Box<dyn Iterator<Item = Idioms> + Send>;

/// A thread factory.
#[derive(Clone)]
pub struct Rules(Arc<dyn Fn() -> Coroutine + Send + Sync>);

impl Rules {
    /// Wrap a factory that builds a fresh coroutine on each call.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Coroutine + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Start a new coroutine.
    pub fn start(&self) -> Coroutine {
        (self.0)()
    }
}

impl fmt::Debug for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Rules(..)")
    }
}

/// A thread that yields `idioms` exactly once, then completes.
pub fn step(idioms: Idioms) -> Rules {
    Rules::new(move || Box::new(std::iter::once(idioms.clone())))
}

/// When a [`repeating`] sequence starts another pass.
#[derive(Clone)]
pub enum Repeat {
    /// Restart unconditionally after every pass.
    Always,
    /// Restart while the predicate holds. Checked once at the end of each
    /// full pass, never before the first pass and never mid-pass.
    While(Arc<dyn Fn() -> bool + Send + Sync>),
}

impl Repeat {
    /// Build a [`Repeat::While`].
    pub fn when<F>(f: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self::While(Arc::new(f))
    }

    fn again(&self) -> bool {
        match self {
            Self::Always => true,
            Self::While(p) => p(),
        }
    }
}

impl fmt::Debug for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("Always"),
            Self::While(_) => f.write_str("While(..)"),
        }
    }
}

/// A thread that yields every step's declarations in order, once.
///
/// An empty list completes immediately without yielding.
pub fn sequence(rules: impl IntoIterator<Item = Rules>) -> Rules {
    build(rules.into_iter().collect(), None)
}

/// Like [`sequence`], but the whole list restarts after each completed pass
/// while `repeat` allows it.
///
/// A pass that yields nothing ends the thread rather than spinning.
pub fn repeating(rules: impl IntoIterator<Item = Rules>, repeat: Repeat) -> Rules {
    build(rules.into_iter().collect(), Some(repeat))
}

fn build(rules: Arc<[Rules]>, repeat: Option<Repeat>) -> Rules {
    Rules::new(move || {
        Box::new(Sequence {
            rules: Arc::clone(&rules),
            repeat: repeat.clone(),
            index: 0,
            current: None,
            yielded: false,
            done: false,
        })
    })
}

struct Sequence {
    rules: Arc<[Rules]>,
    repeat: Option<Repeat>,
    index: usize,
    current: Option<Coroutine>,
    // whether the current pass has yielded anything
    yielded: bool,
    done: bool,
}

impl Iterator for Sequence {
    type Item = Idioms;

    fn next(&mut self) -> Option<Idioms> {
        while !self.done {
            if let Some(current) = self.current.as_mut() {
                match current.next() {
                    Some(idioms) => {
                        self.yielded = true;
                        return Some(idioms);
                    }
                    None => {
                        self.current = None;
                        self.index += 1;
                    }
                }
            } else if let Some(rules) = self.rules.get(self.index) {
                self.current = Some(rules.start());
            } else {
                let again = self.yielded && self.repeat.as_ref().is_some_and(Repeat::again);
                if again {
                    self.index = 0;
                    self.yielded = false;
                } else {
                    self.done = true;
                }
            }
        }
        None
    }
}
