use super::*;

fn observer_with_drop_at(at: Instant) -> VisibilityObserver {
    let mut observer = VisibilityObserver::new();
    observer.update(40, at);
    assert!(observer.update(12, at));
    observer
}

#[test]
fn rename_start_always_resolves_to_rename() {
    assert_eq!(resolve_mode(StartKind::StartedRename, false), ReferencesCommandMode::Rename);
    assert_eq!(resolve_mode(StartKind::StartedRename, true), ReferencesCommandMode::Rename);
}

#[test]
fn plain_start_resolves_to_find_or_peek() {
    assert_eq!(resolve_mode(StartKind::Started, false), ReferencesCommandMode::Find);
    assert_eq!(resolve_mode(StartKind::Started, true), ReferencesCommandMode::Peek);
}

#[test]
fn drop_500ms_before_start_is_peek() {
    let dropped_at = Instant::now();
    let observer = observer_with_drop_at(dropped_at);
    let mut resolver = CommandModeResolver::new();
    let mode = resolver.resolve(
        StartKind::Started,
        &observer,
        DEFAULT_PEEK_WINDOW,
        dropped_at + Duration::from_millis(500),
    );
    assert_eq!(mode, ReferencesCommandMode::Peek);
    assert_eq!(resolver.active(), ReferencesCommandMode::Peek);
}

#[test]
fn drop_1500ms_before_start_is_find() {
    let dropped_at = Instant::now();
    let observer = observer_with_drop_at(dropped_at);
    let mut resolver = CommandModeResolver::new();
    let mode = resolver.resolve(
        StartKind::Started,
        &observer,
        DEFAULT_PEEK_WINDOW,
        dropped_at + Duration::from_millis(1500),
    );
    assert_eq!(mode, ReferencesCommandMode::Find);
}

#[test]
fn growth_and_first_sample_do_not_count_as_drops() {
    let now = Instant::now();
    let mut observer = VisibilityObserver::new();
    assert!(!observer.update(10, now));
    assert!(!observer.update(30, now));
    assert!(!observer.update(30, now));
    assert!(!observer.decreased_within(DEFAULT_PEEK_WINDOW, now));
}

#[test]
fn take_resets_to_none() {
    let now = Instant::now();
    let mut resolver = CommandModeResolver::new();
    resolver.resolve(StartKind::StartedRename, &VisibilityObserver::new(), DEFAULT_PEEK_WINDOW, now);
    assert_eq!(resolver.take(), ReferencesCommandMode::Rename);
    assert_eq!(resolver.active(), ReferencesCommandMode::None);
}
