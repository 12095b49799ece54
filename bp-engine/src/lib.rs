#![deny(missing_docs)]
//! Deterministic scheduler for behavioral programs.
//!
//! A [`Behavioral`] instance owns two sets of threads: *running* threads
//! that still have to reach their next synchronization point, and *pending*
//! threads parked on the [`Idioms`](bp_model::Idioms) they declared. Each
//! super-step advances every running thread, collects the requests of all
//! pending threads, drops the ones any thread blocks, and selects the
//! request with the lowest priority number. Threads that requested or
//! waited for the winner resume; threads it interrupts are finalized. The
//! winner is then handed to feedback subscribers, and the loop continues
//! until no unblocked request remains.
//!
//! Entry points:
//!
//! - [`Behavioral::trigger`] injects an external event at priority 0 and
//!   runs the scheduler to quiescence before returning.
//! - [`Behavioral::threads`] returns the [`BThreads`] registry for adding
//!   or replacing named threads.
//! - [`Behavioral::use_feedback`] subscribes [`Handlers`] to selected events.
//! - [`Behavioral::use_snapshot`] subscribes a diagnostic listener.
//!
//! ```
//! use bp_engine::{Behavioral, Handlers};
//! use bp_model::{BPEvent, Idioms};
//! use bp_thread::{sequence, step};
//! use std::sync::{Arc, Mutex};
//!
//! let bp = Behavioral::new();
//! bp.threads().set([(
//!     "greet",
//!     sequence([
//!         step(Idioms::new().wait_for("start")),
//!         step(Idioms::new().request(BPEvent::new("hello"))),
//!     ]),
//! )]);
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let log = Arc::clone(&seen);
//! let _feedback = bp.use_feedback(Handlers::new().on("hello", move |_| {
//!     log.lock().unwrap().push("hello");
//!     Ok(())
//! }));
//!
//! bp.trigger(BPEvent::new("start"));
//! assert_eq!(*seen.lock().unwrap(), vec!["hello"]);
//! ```

mod bid;
mod feedback;
mod publisher;
mod restricted;
mod scheduler;
mod selection;
mod snapshot;
mod threads;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use feedback::{HandlerFuture, Handlers};
pub use publisher::Disconnect;
pub use restricted::RestrictedTrigger;
pub use scheduler::{Behavioral, TRIGGER_PRIORITY};
pub use threads::{BThreads, ThreadStatus};

use std::sync::{Mutex, MutexGuard, PoisonError};

// Locks are never held across user code, so a poisoned lock still guards
// consistent data.
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
