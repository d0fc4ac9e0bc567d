use tracing::{info, warn};

use crate::{
    clock::Clock,
    config::Config,
    errors::LedgerError,
    ledger::{CalendarDate, CheckInOutcome, LedgerState, SeedPlan, SeedReport, StreakLedger},
    storage::StateStore,
};

/// Whether the state reached storage after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persisted {
    Saved,
    /// The in-memory ledger is still authoritative; the message is for display.
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakSummary {
    pub today: CalendarDate,
    pub current_streak: u32,
    pub real_streak: u32,
    pub repair_balance: u32,
    pub checked_today: bool,
    pub total_checked: usize,
    pub total_repaired: usize,
}

/// Facade that coordinates the ledger, the clock-supplied day, and persistence.
pub struct StreakTracker {
    ledger: StreakLedger,
    storage: Box<dyn StateStore>,
    /// Set when an unreadable record could not be moved aside; saves are
    /// refused so it is never overwritten.
    blocked: Option<String>,
}

impl StreakTracker {
    /// Loads stored state for the clock's current day. Unreadable state is
    /// moved aside and treated as a fresh start.
    pub fn open(storage: Box<dyn StateStore>, clock: &dyn Clock, config: &Config) -> Self {
        let today = clock.today();
        let mut blocked = None;
        let state = match storage.load().and_then(Self::validated) {
            Ok(state) => state,
            Err(err) => {
                warn!(error = %err, "could not load stored state, starting fresh");
                if let Err(aside) = storage.set_aside() {
                    warn!(error = %aside, "unreadable state left in place, saving disabled");
                    blocked = Some(format!(
                        "stored state could not be read and was left untouched ({err})"
                    ));
                }
                LedgerState::default()
            }
        };
        let ledger =
            StreakLedger::from_state(state, today).with_award_interval(config.award_interval);
        info!(
            %today,
            streak = ledger.current_streak(),
            balance = ledger.repair_balance(),
            "tracker opened"
        );
        Self {
            ledger,
            storage,
            blocked,
        }
    }

    fn validated(loaded: Option<LedgerState>) -> Result<LedgerState, LedgerError> {
        let Some(state) = loaded else {
            return Ok(LedgerState::default());
        };
        state.ensure_supported()?;
        Ok(state)
    }

    pub fn ledger(&self) -> &StreakLedger {
        &self.ledger
    }

    pub fn summary(&self) -> StreakSummary {
        let state = self.ledger.state();
        StreakSummary {
            today: self.ledger.today(),
            current_streak: self.ledger.current_streak(),
            real_streak: self.ledger.real_streak(),
            repair_balance: self.ledger.repair_balance(),
            checked_today: self.ledger.is_checked(self.ledger.today()),
            total_checked: state.checked_dates.len(),
            total_repaired: state.repaired_dates.len(),
        }
    }

    pub fn check_in(&mut self) -> (CheckInOutcome, Persisted) {
        let outcome = self.ledger.check_in();
        let persisted = match outcome {
            CheckInOutcome::AlreadyCheckedIn => Persisted::Saved,
            CheckInOutcome::CheckedIn { .. } => self.persist(),
        };
        (outcome, persisted)
    }

    pub fn repair(&mut self, date: CalendarDate) -> Result<Persisted, LedgerError> {
        self.ledger.repair_date(date)?;
        Ok(self.persist())
    }

    pub fn seed(&mut self, plan: &SeedPlan) -> Result<(SeedReport, Persisted), LedgerError> {
        let report = self.ledger.seed(plan)?;
        Ok((report, self.persist()))
    }

    fn persist(&self) -> Persisted {
        if let Some(reason) = &self.blocked {
            return Persisted::Failed(reason.clone());
        }
        match self.storage.save(self.ledger.state()) {
            Ok(()) => Persisted::Saved,
            Err(err) => {
                warn!(error = %err, "failed to save state");
                Persisted::Failed(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{
        clock::FixedClock,
        ledger::SeedMark,
        storage::{MemoryStateStore, Result as StoreResult},
    };

    struct BrokenStore;

    impl StateStore for BrokenStore {
        fn load(&self) -> StoreResult<Option<LedgerState>> {
            Err(LedgerError::Io(std::io::Error::other("disk gone")))
        }

        fn save(&self, _state: &LedgerState) -> StoreResult<()> {
            Err(LedgerError::Io(std::io::Error::other("disk gone")))
        }
    }

    /// Fails to load and to move the record aside, but accepts saves.
    #[derive(Clone, Default)]
    struct StuckStore {
        saves: Arc<Mutex<u32>>,
    }

    impl StateStore for StuckStore {
        fn load(&self) -> StoreResult<Option<LedgerState>> {
            Err(LedgerError::UnsupportedSchema {
                found: 2,
                supported: 1,
            })
        }

        fn save(&self, _state: &LedgerState) -> StoreResult<()> {
            *self.saves.lock().unwrap() += 1;
            Ok(())
        }

        fn set_aside(&self) -> StoreResult<()> {
            Err(LedgerError::Io(std::io::Error::other("read-only directory")))
        }
    }

    fn day(raw: &str) -> CalendarDate {
        CalendarDate::parse(raw).unwrap()
    }

    #[test]
    fn check_in_is_persisted() {
        let store = MemoryStateStore::new();
        let clock = FixedClock(day("2026-02-17"));
        let mut tracker =
            StreakTracker::open(Box::new(store.clone()), &clock, &Config::default());

        let (outcome, persisted) = tracker.check_in();
        assert!(matches!(outcome, CheckInOutcome::CheckedIn { streak: 1, .. }));
        assert_eq!(persisted, Persisted::Saved);
        let saved = store.snapshot().unwrap();
        assert!(saved.checked_dates.contains(&day("2026-02-17")));
    }

    #[test]
    fn unreadable_state_starts_fresh_and_save_failure_keeps_memory() {
        let clock = FixedClock(day("2026-02-17"));
        let mut tracker =
            StreakTracker::open(Box::new(BrokenStore), &clock, &Config::default());
        assert_eq!(tracker.summary().current_streak, 0);

        let (_, persisted) = tracker.check_in();
        assert!(matches!(persisted, Persisted::Failed(_)));
        assert!(tracker.summary().checked_today);
    }

    #[test]
    fn record_that_cannot_be_moved_aside_is_never_overwritten() {
        let store = StuckStore::default();
        let clock = FixedClock(day("2026-02-17"));
        let mut tracker =
            StreakTracker::open(Box::new(store.clone()), &clock, &Config::default());

        let (outcome, persisted) = tracker.check_in();
        assert!(matches!(outcome, CheckInOutcome::CheckedIn { .. }));
        assert!(matches!(persisted, Persisted::Failed(_)));
        assert_eq!(*store.saves.lock().unwrap(), 0);
    }

    #[test]
    fn loaded_state_is_normalized() {
        let mut state = LedgerState::default();
        state.repaired_dates.insert(day("2026-02-16"));
        let store = MemoryStateStore::with_state(state);
        let clock = FixedClock(day("2026-02-17"));

        let tracker = StreakTracker::open(Box::new(store), &clock, &Config::default());
        assert!(tracker.ledger().is_checked(day("2026-02-16")));
        assert_eq!(tracker.summary().current_streak, 1);
        assert_eq!(tracker.summary().real_streak, 0);
    }

    #[test]
    fn seed_then_repair_updates_summary() {
        let store = MemoryStateStore::new();
        let clock = FixedClock(day("2026-02-17"));
        let mut tracker =
            StreakTracker::open(Box::new(store.clone()), &clock, &Config::default());

        let mut plan = SeedPlan::new();
        plan.mark_range(day("2026-02-01"), day("2026-02-15"), SeedMark::Checked);
        let (report, _) = tracker.seed(&plan).unwrap();
        assert_eq!(report.repair_balance, 1);

        tracker.repair(day("2026-02-16")).unwrap();
        let summary = tracker.summary();
        assert_eq!(summary.current_streak, 16);
        assert_eq!(summary.real_streak, 15);
        assert_eq!(summary.repair_balance, 0);
        assert_eq!(summary.total_repaired, 1);
        assert_eq!(store.snapshot().unwrap().repair_balance, 0);
    }
}
