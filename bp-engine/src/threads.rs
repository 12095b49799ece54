//! Named-thread registry.

use crate::bid::RunningBid;
use crate::lock;
use crate::scheduler::Inner;
use bp_model::{BThreadsWarning, SnapshotMessage, ThreadId};
use bp_thread::Rules;
use serde::Serialize;
use std::sync::Arc;

/// Where a named thread currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ThreadStatus {
    /// Waiting to be advanced to its next synchronization point.
    pub running: bool,
    /// Parked on its declared idioms.
    pub pending: bool,
}

impl ThreadStatus {
    /// True if the thread exists at all.
    pub fn is_alive(&self) -> bool {
        self.running || self.pending
    }
}

/// Adds, replaces, and inspects named threads of one scheduler.
#[derive(Clone)]
pub struct BThreads {
    inner: Arc<Inner>,
}

impl BThreads {
    pub(crate) fn new(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    /// Start a fresh coroutine for each named thread.
    ///
    /// Each thread's priority is the running-set size plus one at the
    /// moment it is added, so earlier entries outrank later ones; pass an
    /// ordered collection (array, `Vec`, `BTreeMap`) to control that order.
    ///
    /// A thread with the same name, running or pending, is discarded
    /// without interruption and replaced. Nothing runs until the next
    /// trigger.
    pub fn set<I, K>(&self, threads: I)
    where
        I: IntoIterator<Item = (K, Rules)>,
        K: Into<String>,
    {
        for (name, rules) in threads {
            self.insert(ThreadId::Named(name.into()), &rules, None);
        }
    }

    /// Add one named thread with an explicit priority.
    ///
    /// Priorities equal to another thread's are legal; ties resolve to the
    /// thread that has been pending longest. Depending on that is fragile.
    pub fn set_with_priority(&self, name: impl Into<String>, rules: &Rules, priority: u32) {
        self.insert(ThreadId::Named(name.into()), rules, Some(priority));
    }

    /// Whether a named thread is running and/or pending.
    pub fn has(&self, name: &str) -> ThreadStatus {
        let thread = ThreadId::from(name);
        let bids = lock(&self.inner.bids);
        ThreadStatus {
            running: bids.running.contains(&thread),
            pending: bids.pending.contains(&thread),
        }
    }

    fn insert(&self, thread: ThreadId, rules: &Rules, priority: Option<u32>) {
        let coroutine = rules.start();
        let (replaced_running, replaced_pending) = {
            let mut bids = lock(&self.inner.bids);
            let replaced_running = bids.running.remove(&thread);
            let replaced_pending = bids.pending.remove(&thread);
            let priority = priority.unwrap_or_else(|| bids.running.len() as u32 + 1);
            bids.running.insert(
                thread.clone(),
                RunningBid {
                    priority,
                    coroutine,
                },
            );
            (replaced_running, replaced_pending)
        };
        if replaced_running.is_none() && replaced_pending.is_none() {
            return;
        }
        drop((replaced_running, replaced_pending));

        let warning = format!("Thread \"{thread}\" already existed and was replaced.");
        tracing::warn!(%thread, "replacing existing thread");
        self.inner
            .report(SnapshotMessage::BthreadsWarning(BThreadsWarning {
                thread: thread.to_string(),
                warning,
            }));
    }
}

impl std::fmt::Debug for BThreads {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BThreads(..)")
    }
}
