use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

use super::*;

fn drain(rx: &mut UnboundedReceiver<ProgressParams>) -> Vec<WorkDoneProgress> {
    let mut out = Vec::new();
    while let Ok(params) = rx.try_recv() {
        #[allow(irrefutable_let_patterns)]
        if let ProgressParamsValue::WorkDone(progress) = params.value {
            out.push(progress);
        }
    }
    out
}

#[test]
fn progress_title_adds_prefix_when_missing() {
    assert_eq!(prefixed_progress_title("Find All References"), "References: Find All References".to_string());
}

#[test]
fn progress_title_preserves_existing_prefix() {
    assert_eq!(prefixed_progress_title("References: Rename"), "References: Rename".to_string());
}

#[test]
fn begin_report_end_sequence() {
    let (tx, mut rx) = unbounded_channel();
    let mut host = WorkDoneProgressHost::new(tx);
    host.begin("Find All References");
    host.report("4/10 files searched", 10.7);
    host.end();

    let sent = drain(&mut rx);
    assert_eq!(sent.len(), 3);
    match &sent[0] {
        WorkDoneProgress::Begin(begin) => {
            assert_eq!(begin.title, "References: Find All References");
            assert_eq!(begin.cancellable, Some(true));
        },
        other => panic!("expected Begin, got {other:?}"),
    }
    match &sent[1] {
        WorkDoneProgress::Report(report) => {
            assert_eq!(report.message.as_deref(), Some("4/10 files searched"));
            assert_eq!(report.percentage, Some(10));
        },
        other => panic!("expected Report, got {other:?}"),
    }
    assert!(matches!(sent[2], WorkDoneProgress::End(_)));
}

#[test]
fn report_without_begin_is_dropped() {
    let (tx, mut rx) = unbounded_channel();
    let mut host = WorkDoneProgressHost::new(tx);
    host.report("ignored", 50.0);
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn cancel_only_applies_to_live_token() {
    let (tx, _rx) = unbounded_channel();
    let mut host = WorkDoneProgressHost::new(tx);
    host.begin("Rename");
    let stale = WorkDoneProgressCancelParams {
        token: NumberOrString::String("references/Rename/0".to_string()),
    };
    assert!(!host.handle_cancel(&stale));
    assert!(!host.cancellation_requested());

    let live = WorkDoneProgressCancelParams {
        token: host.token().cloned().expect("live token"),
    };
    assert!(host.handle_cancel(&live));
    assert!(host.cancellation_requested());
}

#[test]
fn dropping_live_presentation_ends_it() {
    let (tx, mut rx) = unbounded_channel();
    let mut host = WorkDoneProgressHost::new(tx);
    host.begin("Peek References");
    drop(host);
    let sent = drain(&mut rx);
    match sent.last() {
        Some(WorkDoneProgress::End(end)) => assert_eq!(end.message.as_deref(), Some("Cancelled")),
        other => panic!("expected End, got {other:?}"),
    }
}
