use super::*;

fn report(
    message: &str,
    increment: f64,
) -> ProgressReport {
    ProgressReport {
        message: message.to_string(),
        increment,
    }
}

#[test]
fn first_offer_always_goes_out() {
    let mut throttle = ProgressThrottle::new();
    let pushed = throttle.offer(&report("1/10 files searched", 2.5), false).expect("pushed");
    assert_eq!(pushed.increment, 2.5);
}

#[test]
fn identical_report_is_suppressed() {
    let mut throttle = ProgressThrottle::new();
    throttle.offer(&report("1/10 files searched", 2.5), false);
    assert!(throttle.offer(&report("1/10 files searched", 2.5), false).is_none());
}

#[test]
fn force_pushes_identical_report() {
    let mut throttle = ProgressThrottle::new();
    throttle.offer(&report("1/10 files searched", 2.5), false);
    assert!(throttle.offer(&report("1/10 files searched", 2.5), true).is_some());
}

#[test]
fn message_change_pushes_without_going_backward() {
    let mut throttle = ProgressThrottle::new();
    throttle.offer(&report("10/10 files searched", 25.0), false);
    let pushed = throttle.offer(&report("0/10 files confirmed", 20.0), false).expect("message changed");
    assert_eq!(pushed.message, "0/10 files confirmed");
    assert_eq!(pushed.increment, 25.0);
    assert_eq!(throttle.last_increment(), 25.0);
}

#[test]
fn pushed_increments_never_regress() {
    let mut throttle = ProgressThrottle::new();
    let samples = [
        report("a", 5.0),
        report("b", 3.0),
        report("b", 4.0),
        report("c", 12.0),
        report("d", 1.0),
        report("d", 40.0),
    ];
    let mut last = 0.0;
    for sample in &samples {
        if let Some(pushed) = throttle.offer(sample, false) {
            assert!(pushed.increment >= last);
            last = pushed.increment;
        }
    }
    assert_eq!(last, 40.0);
}

#[test]
fn reset_clears_the_baseline() {
    let mut throttle = ProgressThrottle::new();
    throttle.offer(&report("5/10 files searched", 12.5), false);
    throttle.reset();
    assert_eq!(throttle.last_increment(), 0.0);
    let pushed = throttle.offer(&report("5/10 files searched", 12.5), false).expect("baseline cleared");
    assert_eq!(pushed.increment, 12.5);
}
