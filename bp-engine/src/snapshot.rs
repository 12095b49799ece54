//! Lazily allocated diagnostic channel.

use crate::lock;
use crate::publisher::{Disconnect, Listener, Publisher};
use crate::scheduler::Inner;
use bp_model::SnapshotMessage;
use std::sync::Arc;

pub(crate) fn subscribe(inner: &Arc<Inner>, listener: Listener<SnapshotMessage>) -> Disconnect {
    let publisher = {
        let mut slot = lock(&inner.snapshot);
        Arc::clone(slot.get_or_insert_with(|| Arc::new(Publisher::new())))
    };
    let id = publisher.subscribe(listener);
    let scheduler = Arc::downgrade(inner);
    Disconnect::new(move || {
        publisher.unsubscribe(id);
        let Some(inner) = scheduler.upgrade() else {
            return;
        };
        // The last listener out releases the publisher, so selection stops
        // building snapshots.
        let mut slot = lock(&inner.snapshot);
        if slot
            .as_ref()
            .is_some_and(|p| Arc::ptr_eq(p, &publisher) && p.is_empty())
        {
            *slot = None;
        }
    })
}
