//! The scheduler's working records.

use bp_model::{Idioms, ThreadId};
use bp_thread::Coroutine;
use std::collections::VecDeque;

/// A thread that still has to reach its next synchronization point.
pub(crate) struct RunningBid {
    pub priority: u32,
    pub coroutine: Coroutine,
}

/// A thread parked on its declared idioms.
pub(crate) struct PendingBid {
    pub priority: u32,
    pub coroutine: Coroutine,
    pub idioms: Idioms,
}

impl PendingBid {
    pub fn into_running(self) -> RunningBid {
        RunningBid {
            priority: self.priority,
            coroutine: self.coroutine,
        }
    }
}

/// Insertion-ordered map keyed by thread identity.
///
/// Iteration order is the tie-break between equal priorities, so it must
/// be stable: replacing an existing key keeps its position, new keys go
/// last, and removal preserves the order of the rest.
pub(crate) struct BidMap<B> {
    entries: Vec<(ThreadId, B)>,
}

impl<B> BidMap<B> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, thread: ThreadId, bid: B) -> Option<B> {
        match self.entries.iter_mut().find(|(t, _)| *t == thread) {
            Some((_, slot)) => Some(std::mem::replace(slot, bid)),
            None => {
                self.entries.push((thread, bid));
                None
            }
        }
    }

    pub fn remove(&mut self, thread: &ThreadId) -> Option<B> {
        let index = self.entries.iter().position(|(t, _)| t == thread)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains(&self, thread: &ThreadId) -> bool {
        self.entries.iter().any(|(t, _)| t == thread)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ThreadId, &B)> {
        self.entries.iter().map(|(t, b)| (t, b))
    }

    /// Drop the entries `keep` rejects. Returns how many were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&ThreadId) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(t, _)| keep(t));
        before - self.entries.len()
    }

    /// Move every entry out, leaving the map empty.
    pub fn take(&mut self) -> Vec<(ThreadId, B)> {
        std::mem::take(&mut self.entries)
    }
}

/// Both thread sets plus triggers from other OS threads not yet injected.
/// A thread identity is in at most one of them.
pub(crate) struct Bids {
    pub running: BidMap<RunningBid>,
    pub pending: BidMap<PendingBid>,
    pub queued: VecDeque<(ThreadId, RunningBid)>,
}

impl Bids {
    pub fn new() -> Self {
        Self {
            running: BidMap::new(),
            pending: BidMap::new(),
            queued: VecDeque::new(),
        }
    }

    /// Drop every trigger thread, injected or not. Returns how many.
    pub fn discard_triggers(&mut self) -> usize {
        let queued = self.queued.len();
        self.queued.clear();
        queued
            + self.running.retain(|t| !t.is_trigger())
            + self.pending.retain(|t| !t.is_trigger())
    }
}
