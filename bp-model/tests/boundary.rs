//! Acceptance tests for the vocabulary crate.
//!
//! Tests cover:
//! - Boundary validation of untyped input
//! - Send + Sync of everything a thread may hold
//! - Thread identity rendering

use bp_model::*;
use serde_json::json;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Boundary validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn accepts_object_with_string_type() {
    assert!(is_bp_event(&json!({"type": "X"})));
    assert!(is_bp_event(&json!({"type": "X", "detail": {"square": 1}})));
}

#[test]
fn rejects_everything_else() {
    assert!(!is_bp_event(&json!(null)));
    assert!(!is_bp_event(&json!("X")));
    assert!(!is_bp_event(&json!(["X"])));
    assert!(!is_bp_event(&json!({})));
    assert!(!is_bp_event(&json!({"type": 7})));
    assert!(!is_bp_event(&json!({"kind": "X"})));
}

#[test]
fn from_value_decodes_detail() {
    let event = BPEvent::from_value(json!({"type": "O", "detail": {"square": 0}})).unwrap();
    assert_eq!(event.event_type, "O");
    assert_eq!(event.get("square"), Some(&json!(0)));
}

#[test]
fn from_value_reports_why() {
    let err = BPEvent::from_value(json!({"type": false})).unwrap_err();
    assert!(matches!(err, EventError::Malformed(_)));
    assert!(err.to_string().contains("not a string"));

    let err = BPEvent::from_value(json!(42)).unwrap_err();
    assert!(err.to_string().contains("got a number"));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Send + Sync
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn _assert_send_sync<T: Send + Sync>() {}

#[test]
fn idioms_are_send_sync() {
    _assert_send_sync::<Idioms>();
    _assert_send_sync::<Listener>();
    _assert_send_sync::<EventTemplate>();
    _assert_send_sync::<SnapshotMessage>();
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Identity
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn thread_ids_render_for_snapshots() {
    assert_eq!(ThreadId::from("enforceTurns").to_string(), "enforceTurns");
    let t = ThreadId::Trigger {
        seq: 3,
        event_type: "X".into(),
    };
    assert_eq!(t.to_string(), "trigger(X)#3");
    assert!(t.is_trigger());
    assert_eq!(t.name(), None);
}

#[test]
fn snapshot_message_decodes_feedback_error() {
    let msg: SnapshotMessage = serde_json::from_value(json!({
        "kind": "feedback_error",
        "type": "process",
        "detail": {"id": 42},
        "error": "invalid input"
    }))
    .unwrap();
    assert_eq!(
        msg,
        SnapshotMessage::FeedbackError(FeedbackError {
            event_type: "process".into(),
            detail: Some(json!({"id": 42})),
            error: "invalid input".into(),
        })
    );
}
