mod common;

use bp_engine::{Behavioral, Handlers, TRIGGER_PRIORITY};
use bp_model::{BPEvent, Idioms, Listener};
use bp_thread::{repeating, sequence, step, Repeat, Rules};
use common::{record, taken};
use serde_json::json;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

fn times(n: usize, idioms: Idioms) -> Rules {
    sequence((0..n).map(|_| step(idioms.clone())))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Selection order
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn earlier_threads_outrank_later_ones() {
    let bp = Behavioral::new();
    bp.threads().set([
        ("first", step(Idioms::new().request("a"))),
        ("second", step(Idioms::new().request("b"))),
    ]);
    let (log, _d) = record(&bp, &["a", "b"]);
    bp.trigger("go");
    assert_eq!(taken(&log), vec!["a", "b"]);
}

#[test]
fn sequences_run_to_completion_in_priority_order() {
    let bp = Behavioral::new();
    bp.threads().set([
        ("addHot", times(3, Idioms::new().request("hot"))),
        ("addCold", times(3, Idioms::new().request("cold"))),
    ]);
    let (log, _d) = record(&bp, &["hot", "cold"]);
    bp.trigger("start");
    assert_eq!(taken(&log), vec!["hot", "hot", "hot", "cold", "cold", "cold"]);
}

#[test]
fn block_outranks_priority() {
    let bp = Behavioral::new();
    bp.threads().set([
        ("addHot", times(3, Idioms::new().request("hot"))),
        ("addCold", times(3, Idioms::new().request("cold"))),
        (
            "mixer",
            repeating(
                [
                    step(Idioms::new().wait_for("hot").block("cold")),
                    step(Idioms::new().wait_for("cold").block("hot")),
                ],
                Repeat::Always,
            ),
        ),
    ]);
    let (log, _d) = record(&bp, &["hot", "cold"]);
    bp.trigger("start");
    assert_eq!(taken(&log), vec!["hot", "cold", "hot", "cold", "hot", "cold"]);
}

#[test]
fn trigger_outranks_registered_requests() {
    assert_eq!(TRIGGER_PRIORITY, 0);
    let bp = Behavioral::new();
    bp.threads().set([("chatter", step(Idioms::new().request("chatter")))]);
    let (log, _d) = record(&bp, &["chatter", "go"]);
    bp.trigger("go");
    assert_eq!(taken(&log), vec!["go", "chatter"]);
}

#[test]
fn blocked_trigger_is_dropped_silently() {
    let bp = Behavioral::new();
    bp.threads().set([("guard", step(Idioms::new().block("go")))]);
    let (log, _d) = record(&bp, &["go"]);
    bp.trigger("go");
    assert!(taken(&log).is_empty());
}

#[test]
fn self_blocking_request_never_selected() {
    let bp = Behavioral::new();
    bp.threads().set([("stuck", step(Idioms::new().request("x").block("x")))]);
    let (log, _d) = record(&bp, &["x"]);
    bp.trigger("go");
    assert!(taken(&log).is_empty());
    assert!(bp.threads().has("stuck").pending);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Notification
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn waiting_thread_resumes_on_its_event() {
    let bp = Behavioral::new();
    bp.threads().set([(
        "responder",
        sequence([
            step(Idioms::new().wait_for("ping")),
            step(Idioms::new().request("pong")),
        ]),
    )]);
    let (log, _d) = record(&bp, &["ping", "pong"]);
    bp.trigger("ping");
    assert_eq!(taken(&log), vec!["ping", "pong"]);
    assert!(!bp.threads().has("responder").is_alive());
}

#[test]
fn unrelated_events_leave_a_waiter_pending() {
    let bp = Behavioral::new();
    bp.threads().set([(
        "responder",
        sequence([
            step(Idioms::new().wait_for("ping")),
            step(Idioms::new().request("pong")),
        ]),
    )]);
    let (log, _d) = record(&bp, &["pong"]);
    bp.trigger("noise");
    assert!(taken(&log).is_empty());
    assert!(bp.threads().has("responder").pending);
}

#[test]
fn predicate_listener_inspects_detail() {
    let bp = Behavioral::new();
    let is_x = Listener::predicate(|e: &BPEvent| e.get("player") == Some(&json!("X")));
    bp.threads().set([(
        "xMoved",
        sequence([
            step(Idioms::new().wait_for(is_x)),
            step(Idioms::new().request("noted")),
        ]),
    )]);
    let (log, _d) = record(&bp, &["noted"]);

    bp.trigger(BPEvent::new("move").with_detail(json!({ "player": "O" })));
    assert!(taken(&log).is_empty());

    bp.trigger(BPEvent::new("move").with_detail(json!({ "player": "X" })));
    assert_eq!(taken(&log), vec!["noted"]);
}

#[test]
fn interrupted_thread_is_finalized() {
    let bp = Behavioral::new();
    bp.threads().set([(
        "worker",
        sequence([
            step(Idioms::new().wait_for("work").interrupt("stop")),
            step(Idioms::new().request("done")),
        ]),
    )]);
    let (log, _d) = record(&bp, &["done"]);

    bp.trigger("stop");
    assert!(!bp.threads().has("worker").is_alive());

    bp.trigger("work");
    assert!(taken(&log).is_empty());
}

#[test]
fn interrupt_wins_over_wait_for_on_the_same_event() {
    let bp = Behavioral::new();
    bp.threads().set([(
        "worker",
        sequence([
            step(Idioms::new().wait_for("stop").interrupt("stop")),
            step(Idioms::new().request("after")),
        ]),
    )]);
    let (log, _d) = record(&bp, &["after"]);
    bp.trigger("stop");
    assert!(taken(&log).is_empty());
}

#[test]
fn template_is_evaluated_once_per_super_step() {
    let bp = Behavioral::new();
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);
    bp.threads().set([(
        "ticker",
        times(
            2,
            Idioms::new().request_with(move || {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                BPEvent::new("tick").with_detail(json!({ "n": n }))
            }),
        ),
    )]);

    let details = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = Arc::clone(&details);
    let _d = bp.use_feedback(Handlers::new().on("tick", move |detail| {
        sink.lock().unwrap().push(detail["n"].clone());
        Ok(())
    }));

    bp.trigger("go");
    // Super-steps: [go wins, tick#0 evaluated], [tick#1 wins], [tick#2 wins].
    assert_eq!(*details.lock().unwrap(), vec![json!(1), json!(2)]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Execution model
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn set_alone_runs_nothing() {
    let bp = Behavioral::new();
    let (log, _d) = record(&bp, &["a"]);
    bp.threads().set([("eager", step(Idioms::new().request("a")))]);
    assert!(taken(&log).is_empty());
    assert!(bp.threads().has("eager").running);

    bp.trigger("go");
    assert_eq!(taken(&log), vec!["a"]);
}

#[test]
fn trigger_from_a_handler_drains_before_returning() {
    let bp = Behavioral::new();
    let (log, _d) = record(&bp, &["ping", "pong"]);
    let inner = bp.clone();
    let relay = bp.use_feedback(Handlers::new().on("ping", move |_| {
        inner.trigger("pong");
        Ok(())
    }));

    bp.trigger("ping");
    assert_eq!(taken(&log), vec!["ping", "pong"]);
    relay.disconnect();
}

#[test]
fn handler_trigger_waits_for_later_subscribers() {
    let bp = Behavioral::new();
    let inner = bp.clone();
    let _relay = bp.use_feedback(Handlers::new().on("ping", move |_| {
        inner.trigger("pong");
        Ok(())
    }));
    let (log, _d) = record(&bp, &["ping", "pong"]);

    bp.trigger("ping");
    assert_eq!(taken(&log), vec!["ping", "pong"]);
}

#[test]
fn handler_trigger_preempts_pending_requests() {
    let bp = Behavioral::new();
    bp.threads().set([(
        "counter",
        sequence([
            step(Idioms::new().wait_for("start")),
            times(3, Idioms::new().request("tick").interrupt("stop")),
        ]),
    )]);
    let (log, _d) = record(&bp, &["tick", "stop"]);
    let armed = Arc::new(AtomicBool::new(true));
    let inner = bp.clone();
    let _stopper = bp.use_feedback(Handlers::new().on("tick", move |_| {
        if armed.swap(false, Ordering::SeqCst) {
            inner.trigger("stop");
        }
        Ok(())
    }));

    bp.trigger("start");
    assert_eq!(taken(&log), vec!["tick", "stop"]);
    assert!(!bp.threads().has("counter").is_alive());
}

#[test]
fn handler_trigger_interrupts_an_endless_thread() {
    let bp = Behavioral::new();
    bp.threads().set([(
        "ticker",
        repeating(
            [step(Idioms::new().request("tick").interrupt("stop"))],
            Repeat::Always,
        ),
    )]);
    let (log, _d) = record(&bp, &["tick", "stop"]);
    let ticks = Arc::new(AtomicU32::new(0));
    let inner = bp.clone();
    let _stopper = bp.use_feedback(Handlers::new().on("tick", move |_| {
        if ticks.fetch_add(1, Ordering::SeqCst) + 1 == 3 {
            inner.trigger("stop");
        }
        Ok(())
    }));

    bp.trigger("start");
    assert_eq!(taken(&log), vec!["tick", "tick", "tick", "stop"]);
    assert!(!bp.threads().has("ticker").is_alive());
}

#[test]
fn sibling_triggers_from_one_handler_all_fire() {
    let bp = Behavioral::new();
    let (log, _d) = record(&bp, &["go", "a", "b"]);
    let inner = bp.clone();
    let _fan = bp.use_feedback(Handlers::new().on("go", move |_| {
        inner.trigger("a");
        inner.trigger("b");
        Ok(())
    }));

    bp.trigger("go");
    assert_eq!(taken(&log), vec!["go", "a", "b"]);
}

#[test]
fn handler_panic_unwinds_and_instance_stays_usable() {
    let bp = Behavioral::new();
    let (log, _d) = record(&bp, &["boom", "next"]);
    let armed = Arc::new(AtomicBool::new(true));
    let trap = Arc::clone(&armed);
    let _p = bp.use_feedback(Handlers::new().on("boom", move |_| {
        if trap.swap(false, Ordering::SeqCst) {
            panic!("handler exploded");
        }
        Ok(())
    }));

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| bp.trigger("boom")));
    assert!(outcome.is_err());

    bp.trigger("next");
    assert_eq!(taken(&log), vec!["boom", "next"]);
}

#[test]
fn panicking_template_discards_the_stale_trigger() {
    let bp = Behavioral::new();
    let (log, _d) = record(&bp, &["boom", "next"]);
    let armed = Arc::new(AtomicBool::new(true));
    bp.threads().set([(
        "flaky",
        step(Idioms::new().request_with(move || {
            if armed.swap(false, Ordering::SeqCst) {
                panic!("template exploded");
            }
            BPEvent::new("later")
        })),
    )]);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| bp.trigger("boom")));
    assert!(outcome.is_err());
    assert!(bp.threads().has("flaky").pending);

    bp.trigger("next");
    assert_eq!(taken(&log), vec!["next"]);
}

#[test]
fn instances_share_nothing() {
    let a = Behavioral::new();
    let b = Behavioral::new();
    a.threads().set([("only-a", step(Idioms::new().request("x")))]);
    let (log_b, _d) = record(&b, &["x"]);
    b.trigger("go");
    assert!(taken(&log_b).is_empty());
    assert!(!b.threads().has("only-a").is_alive());
}

#[test]
fn triggers_from_other_os_threads_are_serialized() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let bp = Behavioral::with_label("concurrent");
    let (log, _d) = record(&bp, &["tick"]);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let bp = bp.clone();
            std::thread::spawn(move || {
                for _ in 0..25 {
                    bp.trigger("tick");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(taken(&log).len(), 100);
    assert_eq!(bp.label(), Some("concurrent"));
}

#[test]
fn scheduler_is_send_and_sync() {
    fn _assert_send_sync<T: Send + Sync>() {}
    _assert_send_sync::<Behavioral>();
    _assert_send_sync::<bp_engine::BThreads>();
    _assert_send_sync::<bp_engine::RestrictedTrigger>();
}
