use crate::model::TargetReferencesProgress::*;

use super::*;

fn targets(counts: &[(TargetReferencesProgress, usize)]) -> Vec<TargetReferencesProgress> {
    counts.iter().flat_map(|(state, count)| std::iter::repeat_n(*state, *count)).collect()
}

#[test]
fn ten_targets_partway_through_lexing() {
    let notification = ReportReferencesProgressNotification::targets(targets(&[
        (Lexing, 4),
        (WaitingToLex, 2),
        (Parsing, 4),
    ]));
    let report = compute_report(&notification);
    assert_eq!(report.message, "4/10 files searched");
    assert!((report.increment - 10.0).abs() < 1e-9);
}

#[test]
fn empty_target_array_is_indeterminate() {
    let report = compute_report(&ReportReferencesProgressNotification::targets(Vec::new()));
    assert_eq!(report.message, SEARCHING_MESSAGE);
    assert_eq!(report.increment, 0.0);
}

#[test]
fn confirmed_message_once_confirmation_finishes() {
    let tally = TargetTally::from_targets(&targets(&[
        (FinishedConfirming, 3),
        (ConfirmingReferences, 2),
        (FinishedWithoutConfirming, 5),
    ]));
    assert_eq!(tally.message(), "3/5 files confirmed");
    // lex 10/10 -> 25, parse (2 * 0.5 + 3) / 5 = 0.8 -> 60
    assert!((tally.increment() - 85.0).abs() < 1e-9);
}

#[test]
fn parsing_ahead_of_lexing_switches_to_confirmed_message() {
    let tally = TargetTally::from_targets(&targets(&[(Lexing, 1), (Parsing, 3)]));
    assert_eq!(tally.message(), "0/4 files confirmed");
}

#[test]
fn all_finished_without_confirming_is_complete() {
    let tally = TargetTally::from_targets(&targets(&[(FinishedWithoutConfirming, 6)]));
    assert_eq!(tally.total_to_parse(), 0);
    assert!((tally.increment() - 100.0).abs() < 1e-9);
}

#[test]
fn fixed_stages_report_zero() {
    for (stage, message) in [
        (ReferencesProgress::Started, STARTED_MESSAGE),
        (ReferencesProgress::StartedRename, STARTED_MESSAGE),
        (ReferencesProgress::ProcessingSource, PROCESSING_SOURCE_MESSAGE),
    ] {
        let report = compute_report(&ReportReferencesProgressNotification::stage(stage));
        assert_eq!(report.message, message);
        assert_eq!(report.increment, 0.0);
    }
}

#[test]
fn counts_always_partition_the_target_array() {
    let states = [
        WaitingToLex,
        Lexing,
        WaitingToParse,
        Parsing,
        ConfirmingReferences,
        FinishedWithoutConfirming,
        FinishedConfirming,
    ];
    // Walk every target through the pipeline one step at a time.
    let mut slots = vec![0usize; 7];
    loop {
        let current: Vec<_> = slots.iter().map(|&i| states[i]).collect();
        let tally = TargetTally::from_targets(&current);
        assert_eq!(tally.finished_lexing() + tally.lexing + tally.waiting_to_lex, tally.total);
        assert!(
            tally.finished_confirming + tally.confirming + tally.parsing + tally.finished_without_confirming
                <= tally.total
        );
        assert_eq!(tally.waiting_to_parse(), current.iter().filter(|s| **s == WaitingToParse).count());
        let increment = tally.increment();
        assert!((0.0..=100.0).contains(&increment), "increment out of range: {increment}");

        let Some(next) = slots.iter().position(|&i| i < states.len() - 1) else {
            break;
        };
        slots[next] += 1;
    }
}
