//! The scheduler instance and its super-step loop.

use crate::bid::{Bids, PendingBid, RunningBid};
use crate::feedback::{self, Handlers};
use crate::lock;
use crate::publisher::{Disconnect, Publisher};
use crate::restricted::RestrictedTrigger;
use crate::selection::{Declared, Round, Verdict};
use crate::snapshot;
use crate::threads::BThreads;
use bp_model::{BPEvent, Idioms, Listener, SnapshotMessage, ThreadId};
use bp_thread::step;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

/// Priority of every externally triggered event. Registered threads start
/// at 1, so a trigger outranks all of them unless blocked.
pub const TRIGGER_PRIORITY: u32 = 0;

pub(crate) struct Inner {
    label: Option<String>,
    pub(crate) bids: Mutex<Bids>,
    pub(crate) feedback: Publisher<BPEvent>,
    // Allocated on first snapshot subscription, released with the last.
    pub(crate) snapshot: Mutex<Option<Arc<Publisher<SnapshotMessage>>>>,
    stepping: AtomicBool,
    trigger_seq: AtomicU64,
}

impl Inner {
    /// Deliver a diagnostic message, if anyone is listening.
    pub(crate) fn report(&self, message: SnapshotMessage) {
        let publisher = lock(&self.snapshot).clone();
        if let Some(publisher) = publisher {
            publisher.publish(&message);
        }
    }
}

/// A behavioral program scheduler.
///
/// Cloning yields another handle to the same scheduler. Independent
/// instances share nothing.
///
/// # Execution model
///
/// Every `trigger` drains the scheduler to quiescence before the outermost
/// call returns. Triggers wait in a FIFO and one is injected into
/// `running` before each super-step, so a trigger made during a drain
/// (from a feedback handler, a snapshot listener, or another OS thread)
/// bids in the very next selection, after every subscriber has seen the
/// current event. Such a call returns at once; the drain in progress
/// carries it out. Threads added with [`BThreads::set`] during a drain join
/// the next super-step.
///
/// # Panics
///
/// The scheduler has no error path of its own. A panic in a request
/// template, listener predicate, thread body, or feedback handler unwinds
/// out of the call that started the drain. Threads that were being
/// advanced at that moment are lost, and every trigger thread, injected
/// or queued, is discarded; registered threads left pending stay pending.
/// The instance remains usable.
#[derive(Clone)]
pub struct Behavioral {
    pub(crate) inner: Arc<Inner>,
}

impl Behavioral {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create an empty scheduler whose log output carries `label`.
    pub fn with_label(label: impl Into<String>) -> Self {
        Self::build(Some(label.into()))
    }

    fn build(label: Option<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                label,
                bids: Mutex::new(Bids::new()),
                feedback: Publisher::new(),
                snapshot: Mutex::new(None),
                stepping: AtomicBool::new(false),
                trigger_seq: AtomicU64::new(0),
            }),
        }
    }

    /// The label given at construction.
    pub fn label(&self) -> Option<&str> {
        self.inner.label.as_deref()
    }

    /// Inject an external event.
    ///
    /// The event is wrapped in a one-step thread that requests it at
    /// [`TRIGGER_PRIORITY`] and waits for any event, so the thread is
    /// removed after the next selection whether or not its own request
    /// won. Effects are observable only through feedback.
    pub fn trigger(&self, event: impl Into<BPEvent>) {
        let event = event.into();
        let thread = ThreadId::Trigger {
            seq: self.inner.trigger_seq.fetch_add(1, Ordering::Relaxed),
            event_type: event.event_type.clone(),
        };
        let bid = RunningBid {
            priority: TRIGGER_PRIORITY,
            coroutine: step(Idioms::new().request(event).wait_for(Listener::any())).start(),
        };
        lock(&self.inner.bids).queued.push_back((thread, bid));
        self.run();
    }

    /// The named-thread registry.
    pub fn threads(&self) -> BThreads {
        BThreads::new(Arc::clone(&self.inner))
    }

    /// Subscribe feedback handlers to selected events.
    pub fn use_feedback(&self, handlers: Handlers) -> Disconnect {
        feedback::subscribe(&self.inner, handlers)
    }

    /// Subscribe a diagnostic listener.
    ///
    /// Listeners receive a [`SnapshotMessage::Selection`] for every
    /// super-step, just before the winner reaches feedback, plus the
    /// error and warning messages raised around the scheduler. With no
    /// listener subscribed, snapshots are never computed.
    pub fn use_snapshot<F>(&self, listener: F) -> Disconnect
    where
        F: Fn(&SnapshotMessage) + Send + Sync + 'static,
    {
        snapshot::subscribe(&self.inner, Arc::new(listener))
    }

    /// A trigger that refuses the given event types.
    pub fn use_restricted_trigger<I, S>(&self, restricted: I) -> RestrictedTrigger
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RestrictedTrigger::new(self.clone(), restricted)
    }

    /// Step until quiescent with no trigger left in the queue, unless a
    /// drain is already in progress.
    fn run(&self) {
        loop {
            if self.inner.stepping.swap(true, Ordering::AcqRel) {
                return;
            }
            {
                let _drain = DrainGuard(&self.inner);
                let _span = tracing::debug_span!("bprogram", label = self.label()).entered();
                loop {
                    self.admit();
                    if !self.super_step() && lock(&self.inner.bids).queued.is_empty() {
                        break;
                    }
                }
            }
            // A trigger queued between the last admit and releasing the flag.
            if lock(&self.inner.bids).queued.is_empty() {
                return;
            }
        }
    }

    /// Move the oldest queued trigger into running.
    fn admit(&self) {
        let mut bids = lock(&self.inner.bids);
        if let Some((thread, bid)) = bids.queued.pop_front() {
            tracing::trace!(%thread, "trigger admitted");
            bids.running.insert(thread, bid);
        }
    }

    /// Advance, select, settle, publish. Returns false at quiescence.
    ///
    /// Listeners run only after the bid sets are settled.
    fn super_step(&self) -> bool {
        let running = lock(&self.inner.bids).running.take();
        if running.is_empty() {
            return false;
        }

        let mut advanced = Vec::with_capacity(running.len());
        for (thread, RunningBid { priority, mut coroutine }) in running {
            match coroutine.next() {
                Some(idioms) => advanced.push((
                    thread,
                    PendingBid {
                        priority,
                        coroutine,
                        idioms,
                    },
                )),
                None => tracing::trace!(%thread, "thread completed"),
            }
        }

        let declared: Vec<Declared> = {
            let mut bids = lock(&self.inner.bids);
            for (thread, bid) in advanced {
                bids.pending.insert(thread, bid);
            }
            bids.pending
                .iter()
                .map(|(thread, bid)| Declared {
                    thread: thread.clone(),
                    priority: bid.priority,
                    idioms: bid.idioms.clone(),
                })
                .collect()
        };

        let round = Round::select(declared);
        let Some(winner) = round.winner() else {
            tracing::trace!(
                pending = round.pending_len(),
                candidates = round.candidate_len(),
                "quiescent"
            );
            return false;
        };
        tracing::debug!(
            thread = %winner.thread,
            event_type = %winner.event.event_type,
            priority = winner.priority,
            "selected"
        );

        let snapshot = lock(&self.inner.snapshot).clone().map(|publisher| {
            let message = SnapshotMessage::Selection {
                bids: round.snapshot(),
            };
            (publisher, message)
        });

        let verdicts = round.verdicts();
        let mut finalized = Vec::new();
        {
            let mut bids = lock(&self.inner.bids);
            for (thread, verdict) in verdicts {
                // Gone if a registration replaced it meanwhile.
                let Some(bid) = bids.pending.remove(&thread) else {
                    continue;
                };
                match verdict {
                    Verdict::Interrupted => {
                        tracing::trace!(%thread, "thread interrupted");
                        finalized.push(bid.coroutine);
                    }
                    Verdict::Resumed => {
                        bids.running.insert(thread, bid.into_running());
                    }
                }
            }
        }
        drop(finalized);

        if let Some((publisher, message)) = snapshot {
            publisher.publish(&message);
        }
        self.inner.feedback.publish(&winner.event);
        true
    }
}

impl Default for Behavioral {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Behavioral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bids = lock(&self.inner.bids);
        f.debug_struct("Behavioral")
            .field("label", &self.inner.label)
            .field("running", &bids.running.len())
            .field("pending", &bids.pending.len())
            .field("queued", &bids.queued.len())
            .finish()
    }
}

struct DrainGuard<'a>(&'a Inner);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            let discarded = lock(&self.0.bids).discard_triggers();
            tracing::warn!(discarded, "drain unwound, trigger threads discarded");
        }
        self.0.stepping.store(false, Ordering::Release);
    }
}
