mod common;

use std::fs;

use common::{date, open_tracker};
use streak_core::{
    core::Persisted,
    ledger::{LedgerState, SeedMark, SeedPlan},
    storage::{JsonStateStore, StateStore, STATE_FILE_NAME},
};
use tempfile::TempDir;

/// Contents of every record moved aside after failing to load.
fn set_aside_records(dir: &TempDir) -> Vec<String> {
    let prefix = format!("{STATE_FILE_NAME}.unreadable-");
    fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(&prefix))
        })
        .map(|path| fs::read_to_string(path).unwrap())
        .collect()
}

#[test]
fn progress_survives_a_restart() {
    let dir = TempDir::new().unwrap();
    {
        let mut tracker = open_tracker(&dir, "2026-02-17");
        let mut plan = SeedPlan::new();
        plan.mark_range(date("2026-02-01"), date("2026-02-15"), SeedMark::Checked);
        tracker.seed(&plan).unwrap();
        assert_eq!(tracker.repair(date("2026-02-16")).unwrap(), Persisted::Saved);
        let (_, persisted) = tracker.check_in();
        assert_eq!(persisted, Persisted::Saved);
    }

    let tracker = open_tracker(&dir, "2026-02-18");
    let summary = tracker.summary();
    assert_eq!(summary.current_streak, 17);
    assert_eq!(summary.real_streak, 16);
    assert_eq!(summary.repair_balance, 0);
    assert!(tracker.ledger().is_repaired(date("2026-02-16")));
}

#[test]
fn stored_record_uses_stable_field_names() {
    let dir = TempDir::new().unwrap();
    let mut tracker = open_tracker(&dir, "2026-02-17");
    tracker.check_in();

    let raw = fs::read_to_string(dir.path().join(STATE_FILE_NAME)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["checkedDates"], serde_json::json!(["2026-02-17"]));
    assert_eq!(value["repairedDates"], serde_json::json!([]));
    assert_eq!(value["repairBalance"], serde_json::json!(0));
    assert_eq!(value["schemaVersion"], serde_json::json!(1));
}

#[test]
fn legacy_flag_map_file_is_read_and_normalized() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(STATE_FILE_NAME),
        r#"{
            "checkedDates": {"2026-02-15": true, "2026-02-16": true},
            "repairedDates": {"2026-02-14": true},
            "repairs": 2
        }"#,
    )
    .unwrap();

    let tracker = open_tracker(&dir, "2026-02-17");
    let summary = tracker.summary();
    assert_eq!(summary.current_streak, 3);
    assert_eq!(summary.real_streak, 2);
    assert_eq!(summary.repair_balance, 2);
    assert!(tracker.ledger().state().is_consistent());
}

#[test]
fn corrupt_file_starts_fresh_without_losing_the_next_save() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(STATE_FILE_NAME), "{ not json").unwrap();

    let mut tracker = open_tracker(&dir, "2026-02-17");
    assert_eq!(tracker.summary().total_checked, 0);
    tracker.check_in();

    let store = JsonStateStore::new(Some(dir.path().to_path_buf())).unwrap();
    let saved = store.load().unwrap().unwrap();
    assert_eq!(saved.checked_dates.len(), 1);
    assert_eq!(set_aside_records(&dir), vec!["{ not json".to_string()]);
}

#[test]
fn unreadable_record_survives_later_saves() {
    let dir = TempDir::new().unwrap();
    let newer = r#"{"schemaVersion":2,"checkedDates":["2026-01-01"],"repairedDates":[],"repairBalance":7}"#;
    fs::write(dir.path().join(STATE_FILE_NAME), newer).unwrap();

    {
        let mut tracker = open_tracker(&dir, "2026-02-17");
        assert_eq!(tracker.summary().repair_balance, 0);
        let (_, persisted) = tracker.check_in();
        assert_eq!(persisted, Persisted::Saved);
    }
    {
        let mut tracker = open_tracker(&dir, "2026-02-18");
        assert_eq!(tracker.summary().current_streak, 1);
        let (_, persisted) = tracker.check_in();
        assert_eq!(persisted, Persisted::Saved);
    }

    let kept = set_aside_records(&dir);
    assert_eq!(kept.len(), 1);
    assert!(kept[0].contains(r#""repairBalance":7"#));
    assert!(!fs::read_to_string(dir.path().join(format!("{STATE_FILE_NAME}.bak")))
        .unwrap()
        .contains(r#""repairBalance": 7"#));
}

#[test]
fn failed_save_leaves_previous_file_intact() {
    let dir = TempDir::new().unwrap();
    let store = JsonStateStore::new(Some(dir.path().to_path_buf())).unwrap();
    store.save(&LedgerState::default()).unwrap();
    let original = fs::read_to_string(store.path()).unwrap();

    // A directory squatting on the temp name makes the staged write fail.
    let tmp = dir.path().join(format!("{STATE_FILE_NAME}.tmp"));
    fs::create_dir_all(&tmp).unwrap();

    let mut tracker = open_tracker(&dir, "2026-02-17");
    let (_, persisted) = tracker.check_in();
    assert!(matches!(persisted, Persisted::Failed(_)));
    assert!(tracker.summary().checked_today);
    assert_eq!(fs::read_to_string(store.path()).unwrap(), original);
}
