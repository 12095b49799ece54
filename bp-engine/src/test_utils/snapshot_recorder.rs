//! SnapshotRecorder: keeps every diagnostic message.

use crate::lock;
use crate::publisher::Disconnect;
use crate::scheduler::Behavioral;
use bp_model::{SelectionBid, SnapshotMessage};
use std::sync::{Arc, Mutex};

/// Records every snapshot message published by one scheduler.
pub struct SnapshotRecorder {
    messages: Arc<Mutex<Vec<SnapshotMessage>>>,
    disconnect: Mutex<Option<Disconnect>>,
}

impl SnapshotRecorder {
    /// Subscribe to `bp`'s snapshot channel.
    pub fn attach(bp: &Behavioral) -> Self {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&messages);
        let disconnect = bp.use_snapshot(move |msg| lock(&log).push(msg.clone()));
        Self {
            messages,
            disconnect: Mutex::new(Some(disconnect)),
        }
    }

    /// Every recorded message.
    pub fn messages(&self) -> Vec<SnapshotMessage> {
        lock(&self.messages).clone()
    }

    /// Only the selection rounds, one `Vec` of rows per super-step.
    pub fn selections(&self) -> Vec<Vec<SelectionBid>> {
        lock(&self.messages)
            .iter()
            .filter_map(|m| m.bids().map(<[SelectionBid]>::to_vec))
            .collect()
    }

    /// Stop recording. Later calls do nothing.
    pub fn detach(&self) {
        if let Some(disconnect) = lock(&self.disconnect).take() {
            disconnect.disconnect();
        }
    }
}

impl std::fmt::Debug for SnapshotRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotRecorder")
            .field("messages", &lock(&self.messages).len())
            .finish()
    }
}
