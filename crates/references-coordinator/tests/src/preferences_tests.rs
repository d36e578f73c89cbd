use std::time::{SystemTime, UNIX_EPOCH};

use super::*;

fn temporary_file(test_name: &str) -> PathBuf {
    let unique = SystemTime::now().duration_since(UNIX_EPOCH).expect("system time should be after UNIX_EPOCH").as_nanos();
    std::env::temp_dir().join(format!("references-coordinator-{test_name}-{}-{unique}.json", std::process::id()))
}

#[test]
fn group_by_file_falls_back_to_default() {
    let store = MemoryPreferences::new();
    assert!(!GroupByFile::new(false).get(&store));
    assert!(GroupByFile::new(true).get(&store));
}

#[test]
fn memory_store_round_trips() {
    let mut store = MemoryPreferences::new();
    let preference = GroupByFile::new(false);
    preference.set(&mut store, true).expect("memory set never fails");
    assert!(preference.get(&store));
    assert_eq!(store.get_bool("unrelated"), None);
}

#[test]
fn file_store_persists_across_reopen() {
    let path = temporary_file("persist");
    {
        let mut store = FilePreferences::open(&path).expect("missing file opens empty");
        assert_eq!(store.get_bool(GROUP_BY_FILE_KEY), None);
        store.set_bool(GROUP_BY_FILE_KEY, true).expect("write preferences");
    }
    let reopened = FilePreferences::open(&path).expect("reopen");
    assert_eq!(reopened.get_bool(GROUP_BY_FILE_KEY), Some(true));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn file_store_rejects_garbage() {
    let path = temporary_file("garbage");
    std::fs::write(&path, "not json").expect("write fixture");
    let error = FilePreferences::open(&path).expect_err("garbage must not parse");
    assert!(matches!(error, PreferenceError::Parse { .. }));
    assert!(error.to_string().contains("invalid preferences file"));
    let _ = std::fs::remove_file(&path);
}
