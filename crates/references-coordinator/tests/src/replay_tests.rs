use std::sync::{Arc, atomic::AtomicBool};

use super::*;
use crate::{
    preferences::MemoryPreferences,
    recording::{HostCall, Recorder},
};

const FIND_SCRIPT: &str = r#"
# find with a slow engine
{"atMs": 0, "event": {"kind": "startFind", "params": {"file": "/src/main.cpp", "position": {"line": 4, "character": 2}}}}
{"atMs": 0, "event": {"kind": "progress", "notification": {"referenceProgress": "started"}}}
{"atMs": 2500, "event": {"kind": "result", "result": {"references": [{"file": "/src/main.cpp", "position": {"line": 4, "character": 2}, "text": "foo();", "type": "confirmed"}], "isFinished": true}}}
{"atMs": 100, "event": {"kind": "progress", "notification": {"referenceProgress": "processingTargets", "targetReferencesProgress": ["lexing", "finishedWithoutConfirming"]}}}
"#;

#[test]
fn parse_skips_comments_and_orders_by_time() {
    let steps = parse_script(FIND_SCRIPT).expect("script parses");
    let times: Vec<u64> = steps.iter().map(|step| step.at_ms).collect();
    assert_eq!(times, vec![0, 0, 100, 2500]);
    assert!(matches!(steps[0].event, ScriptEvent::StartFind { .. }));
    assert!(matches!(steps[1].event, ScriptEvent::Progress { .. }));
}

#[test]
fn parse_reports_the_offending_line() {
    let script = "{\"event\": {\"kind\": \"cancel\"}}\n\n{\"event\": {\"kind\": \"explode\"}}\n";
    match parse_script(script) {
        Err(ReplayError::Parse {
            line, ..
        }) => assert_eq!(line, 3),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn parse_accepts_unit_and_field_events() {
    let script = r#"
{"event": {"kind": "viewRequest"}}
{"atMs": 5, "event": {"kind": "visibleLength", "length": 40}}
{"atMs": 6, "event": {"kind": "indexing", "inProgress": true}}
{"atMs": 7, "event": {"kind": "completeRename", "outcome": {"outcome": "dismissed"}}}
"#;
    let steps = parse_script(script).expect("script parses");
    assert_eq!(steps[0].event, ScriptEvent::ViewRequest);
    assert_eq!(
        steps[1].event,
        ScriptEvent::VisibleLength {
            length: 40
        }
    );
    assert_eq!(
        steps[2].event,
        ScriptEvent::Indexing {
            in_progress: true
        }
    );
    assert_eq!(
        steps[3].event,
        ScriptEvent::CompleteRename {
            outcome: ConfirmationOutcome::Dismissed
        }
    );
}

#[tokio::test(start_paused = true)]
async fn replay_drives_a_slow_find_to_completion() {
    let steps = parse_script(FIND_SCRIPT).expect("script parses");
    let recorder = Recorder::new();
    let callback_recorder = recorder.clone();
    let targets = ReplayTargets {
        hosts: recorder.hosts(Box::new(MemoryPreferences::new())),
        host_cancel: recorder.cancel_flag(),
        callback: Box::new(move || callback_recorder.callback()),
    };

    let coordinator = replay(&steps, CoordinatorSettings::default(), targets, Duration::from_millis(10))
        .await
        .expect("replay succeeds");

    assert!(!coordinator.is_operation_running());
    let calls = recorder.calls();
    assert_eq!(calls.first(), Some(&HostCall::ListClear));
    assert!(calls.contains(&HostCall::ProgressBegin {
        title: "Find All References".to_string()
    }));
    assert!(calls.contains(&HostCall::ProgressEnd));
    assert!(calls.contains(&HostCall::ListShow));
    assert_eq!(
        calls.last(),
        Some(&HostCall::Callback {
            references: Some(1),
            resolve: true
        })
    );
}

#[tokio::test(start_paused = true)]
async fn progress_cancel_step_sets_the_host_flag() {
    let script = r#"{"atMs": 3, "event": {"kind": "progressCancel"}}"#;
    let steps = parse_script(script).expect("script parses");
    let recorder = Recorder::new();
    let flag = Arc::new(AtomicBool::new(false));
    let callback_recorder = recorder.clone();
    let targets = ReplayTargets {
        hosts: recorder.hosts(Box::new(MemoryPreferences::new())),
        host_cancel: Arc::clone(&flag),
        callback: Box::new(move || callback_recorder.callback()),
    };

    replay(&steps, CoordinatorSettings::default(), targets, Duration::ZERO).await.expect("replay succeeds");
    assert!(flag.load(Ordering::Acquire));
    assert!(recorder.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn driver_panic_is_reported_with_its_reason() {
    let script = r#"
{"atMs": 0, "event": {"kind": "completeRename", "outcome": {"outcome": "dismissed"}}}
{"atMs": 10, "event": {"kind": "viewRequest"}}
"#;
    let steps = parse_script(script).expect("script parses");
    let recorder = Recorder::new();
    let callback_recorder = recorder.clone();
    let targets = ReplayTargets {
        hosts: recorder.hosts(Box::new(MemoryPreferences::new())),
        host_cancel: recorder.cancel_flag(),
        callback: Box::new(move || callback_recorder.callback()),
    };

    match replay(&steps, CoordinatorSettings::default(), targets, Duration::ZERO).await {
        Err(ReplayError::DriverPanicked(reason)) => {
            assert!(reason.contains("no confirmation surface is open"), "{reason}");
        },
        Err(other) => panic!("expected a driver panic, got {other}"),
        Ok(_) => panic!("expected a driver panic"),
    }
}
