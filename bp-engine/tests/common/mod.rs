#![allow(dead_code)]

use bp_engine::{Behavioral, Disconnect, Handlers};
use bp_model::SnapshotMessage;
use std::sync::{Arc, Mutex};

/// Shared, appendable log.
pub type Log<T> = Arc<Mutex<Vec<T>>>;

/// Record the type of every selected event in `types`.
pub fn record(bp: &Behavioral, types: &[&str]) -> (Log<String>, Disconnect) {
    let log: Log<String> = Arc::new(Mutex::new(Vec::new()));
    let mut handlers = Handlers::new();
    for ty in types {
        let log = Arc::clone(&log);
        let name = ty.to_string();
        handlers = handlers.on(*ty, move |_| {
            log.lock().unwrap().push(name.clone());
            Ok(())
        });
    }
    let disconnect = bp.use_feedback(handlers);
    (log, disconnect)
}

/// Record every snapshot message.
pub fn snapshots(bp: &Behavioral) -> (Log<SnapshotMessage>, Disconnect) {
    let log: Log<SnapshotMessage> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let disconnect = bp.use_snapshot(move |msg| sink.lock().unwrap().push(msg.clone()));
    (log, disconnect)
}

pub fn taken<T: Clone>(log: &Log<T>) -> Vec<T> {
    log.lock().unwrap().clone()
}
