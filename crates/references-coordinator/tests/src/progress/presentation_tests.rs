use super::*;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn machine() -> (PresentationMachine, GenerationHandle) {
    let generation = GenerationHandle::new();
    (PresentationMachine::new(DEFAULT_START_DELAY, DEFAULT_TICK_INTERVAL, generation.clone()), generation)
}

#[test]
fn idle_machine_has_no_deadline() {
    let (machine, _) = machine();
    assert_eq!(machine.phase(), PresentationPhase::Idle);
    assert_eq!(machine.next_deadline(), None);
}

#[test]
fn shows_only_after_start_delay() {
    let (mut machine, _) = machine();
    let t0 = Instant::now();
    machine.start(t0);
    assert_eq!(machine.next_deadline(), Some(t0 + ms(2000)));
    assert_eq!(machine.on_deadline(t0 + ms(1999)), None);
    assert_eq!(machine.on_deadline(t0 + ms(2000)), Some(PresentationStep::Show));
    assert!(machine.is_presenting());
    assert_eq!(machine.next_deadline(), Some(t0 + ms(3000)));
}

#[test]
fn ticks_periodically_while_presenting() {
    let (mut machine, _) = machine();
    let t0 = Instant::now();
    machine.start(t0);
    machine.on_deadline(t0 + ms(2000));
    assert_eq!(machine.on_deadline(t0 + ms(2500)), None);
    assert_eq!(machine.on_deadline(t0 + ms(3000)), Some(PresentationStep::Tick));
    assert_eq!(machine.on_deadline(t0 + ms(4000)), Some(PresentationStep::Tick));
}

#[test]
fn generation_bump_restarts_once() {
    let (mut machine, generation) = machine();
    let t0 = Instant::now();
    machine.start(t0);
    machine.on_deadline(t0 + ms(2000));
    generation.bump();
    assert_eq!(machine.on_deadline(t0 + ms(3000)), Some(PresentationStep::Restart));
    assert_eq!(machine.on_deadline(t0 + ms(4000)), Some(PresentationStep::Tick));
}

#[test]
fn finishing_before_delay_never_presents() {
    let (mut machine, _) = machine();
    let t0 = Instant::now();
    machine.start(t0);
    assert!(!machine.finish());
    assert_eq!(machine.phase(), PresentationPhase::Finished);
    assert_eq!(machine.on_deadline(t0 + ms(5000)), None);
    assert_eq!(machine.next_deadline(), None);
}

#[test]
fn finishing_while_presenting_reports_visible() {
    let (mut machine, _) = machine();
    let t0 = Instant::now();
    machine.start(t0);
    machine.on_deadline(t0 + ms(2000));
    assert!(machine.finish());
}

#[test]
fn generation_handles_share_counter() {
    let handle = GenerationHandle::new();
    let clone = handle.clone();
    assert_eq!(clone.bump(), 1);
    assert_eq!(handle.current(), 1);
}
