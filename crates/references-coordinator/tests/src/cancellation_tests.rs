use super::*;

#[derive(Default)]
struct CountingEngine {
    cancels: usize,
}

impl SearchEngine for CountingEngine {
    fn request_cancel(&mut self) {
        self.cancels += 1;
    }
}

#[test]
fn first_cancel_signals_engine_once() {
    let mut engine = CountingEngine::default();
    let mut cancellation = CancellationCoordinator::new();
    assert!(cancellation.cancel(&mut engine, false));
    assert!(!cancellation.cancel(&mut engine, true));
    assert_eq!(engine.cancels, 1);
    assert!(cancellation.is_canceled());
    assert!(!cancellation.flags().canceled_while_previewing);
}

#[test]
fn previewing_flag_follows_the_transition() {
    let mut engine = CountingEngine::default();
    let mut cancellation = CancellationCoordinator::new();
    cancellation.cancel(&mut engine, true);
    assert_eq!(
        cancellation.flags(),
        CancellationFlags {
            canceled: true,
            canceled_while_previewing: true,
        }
    );
}

#[test]
fn take_flags_resets_state() {
    let mut engine = CountingEngine::default();
    let mut cancellation = CancellationCoordinator::new();
    cancellation.cancel(&mut engine, true);
    let flags = cancellation.take_flags();
    assert!(flags.canceled && flags.canceled_while_previewing);
    assert_eq!(cancellation.flags(), CancellationFlags::default());

    assert!(cancellation.cancel(&mut engine, false));
    assert_eq!(engine.cancels, 2);
}
