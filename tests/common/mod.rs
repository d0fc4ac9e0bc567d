use streak_core::{
    clock::FixedClock,
    config::Config,
    core::StreakTracker,
    ledger::{CalendarDate, LedgerState, StreakLedger},
    storage::JsonStateStore,
};
use tempfile::TempDir;

pub fn date(raw: &str) -> CalendarDate {
    CalendarDate::parse(raw).expect("valid test date")
}

/// Ledger holding `days` consecutive genuine check-ins ending on `last`.
#[allow(dead_code)]
pub fn ledger_with_run(last: &str, days: u32, today: &str) -> StreakLedger {
    let mut state = LedgerState::default();
    let mut cursor = date(last);
    for _ in 0..days {
        state.checked_dates.insert(cursor);
        cursor = cursor.pred().expect("date in range");
    }
    StreakLedger::from_state(state, date(today))
}

/// Opens a tracker backed by a JSON store inside `dir`.
#[allow(dead_code)]
pub fn open_tracker(dir: &TempDir, today: &str) -> StreakTracker {
    let store = JsonStateStore::new(Some(dir.path().to_path_buf())).expect("create json store");
    StreakTracker::open(Box::new(store), &FixedClock(date(today)), &Config::default())
}
