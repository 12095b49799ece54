//! What a program definition gets to work with.

use bp_engine::{BThreads, Behavioral, Disconnect};
use bp_model::{BPEvent, SnapshotMessage};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Teardown actions owned by one program, run together exactly once.
#[derive(Clone, Default)]
pub(crate) struct DisconnectSet(Arc<Mutex<Vec<Disconnect>>>);

impl DisconnectSet {
    pub fn add(&self, disconnect: Disconnect) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(disconnect);
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Run and forget every recorded action, in the order added.
    pub fn disconnect_all(&self) -> usize {
        let taken = std::mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner));
        let n = taken.len();
        for disconnect in taken {
            disconnect.disconnect();
        }
        n
    }
}

/// Unrestricted trigger for use inside a program, plus a place to park
/// teardown actions.
#[derive(Clone)]
pub struct ProgramTrigger {
    bp: Behavioral,
    disconnects: DisconnectSet,
}

impl ProgramTrigger {
    pub(crate) fn new(bp: Behavioral, disconnects: DisconnectSet) -> Self {
        Self { bp, disconnects }
    }

    /// Inject any event, bypassing the public and restricted lists.
    pub fn trigger(&self, event: impl Into<BPEvent>) {
        self.bp.trigger(event)
    }

    /// Run `disconnect` when the program is torn down.
    pub fn add_disconnect_callback(&self, disconnect: Disconnect) {
        self.disconnects.add(disconnect);
    }
}

impl fmt::Debug for ProgramTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgramTrigger")
            .field("disconnects", &self.disconnects.len())
            .finish()
    }
}

/// Handed to the definition closure of [`Program::define`](crate::Program::define).
#[derive(Debug, Clone)]
pub struct ProgramContext {
    bp: Behavioral,
    trigger: ProgramTrigger,
}

impl ProgramContext {
    pub(crate) fn new(bp: Behavioral, disconnects: DisconnectSet) -> Self {
        let trigger = ProgramTrigger::new(bp.clone(), disconnects);
        Self { bp, trigger }
    }

    /// The program's thread registry.
    pub fn threads(&self) -> BThreads {
        self.bp.threads()
    }

    /// The program's internal trigger.
    pub fn trigger(&self) -> &ProgramTrigger {
        &self.trigger
    }

    /// Subscribe a snapshot listener for the lifetime of the program.
    pub fn use_snapshot<F>(&self, listener: F)
    where
        F: Fn(&SnapshotMessage) + Send + Sync + 'static,
    {
        self.trigger
            .add_disconnect_callback(self.bp.use_snapshot(listener));
    }
}
