use tracing::{debug, info, warn};

use super::{date::CalendarDate, state::LedgerState};
use crate::errors::LedgerError;

pub const DEFAULT_AWARD_INTERVAL: u32 = 10;

/// Result of a check-in attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInOutcome {
    /// Today was already checked; nothing changed.
    AlreadyCheckedIn,
    CheckedIn {
        repair_awarded: bool,
        streak: u32,
        real_streak: u32,
    },
}

impl CheckInOutcome {
    pub fn repair_awarded(&self) -> bool {
        matches!(
            self,
            CheckInOutcome::CheckedIn {
                repair_awarded: true,
                ..
            }
        )
    }
}

/// Answer to "may this date be repaired right now?", asked before confirming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairDecision {
    Allowed { balance_after: u32 },
    NoCredits,
    NotInPast,
    AlreadyChecked,
}

/// Owns the checked/repaired day sets and the repair-credit balance.
///
/// `today` is fixed when the ledger is built so every read within a session
/// walks from the same day boundary.
#[derive(Debug, Clone)]
pub struct StreakLedger {
    state: LedgerState,
    today: CalendarDate,
    award_interval: u32,
}

impl StreakLedger {
    pub fn new(today: CalendarDate) -> Self {
        Self::from_state(LedgerState::default(), today)
    }

    /// Restores a ledger from a stored record. Repaired dates missing from the
    /// checked set are added back so the subset invariant holds.
    pub fn from_state(mut state: LedgerState, today: CalendarDate) -> Self {
        let fixed = state.normalize();
        if fixed > 0 {
            warn!(fixed, "repaired dates were missing from checked dates");
        }
        Self {
            state,
            today,
            award_interval: DEFAULT_AWARD_INTERVAL,
        }
    }

    pub fn with_award_interval(mut self, interval: u32) -> Self {
        self.award_interval = interval.max(1);
        self
    }

    pub fn today(&self) -> CalendarDate {
        self.today
    }

    pub fn award_interval(&self) -> u32 {
        self.award_interval
    }

    pub fn repair_balance(&self) -> u32 {
        self.state.repair_balance
    }

    pub fn is_checked(&self, date: CalendarDate) -> bool {
        self.state.checked_dates.contains(&date)
    }

    pub fn is_repaired(&self, date: CalendarDate) -> bool {
        self.state.repaired_dates.contains(&date)
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn into_state(self) -> LedgerState {
        self.state
    }

    /// Length of the run of checked days ending today, or yesterday when today
    /// is still open.
    pub fn current_streak(&self) -> u32 {
        self.walk(|_| true)
    }

    /// Same walk as [`current_streak`](Self::current_streak), but repaired days
    /// only bridge the gap and are not counted.
    pub fn real_streak(&self) -> u32 {
        self.walk(|date| !self.state.repaired_dates.contains(date))
    }

    fn walk(&self, counts: impl Fn(&CalendarDate) -> bool) -> u32 {
        let mut cursor = if self.is_checked(self.today) {
            Some(self.today)
        } else {
            self.today.pred()
        };
        let mut total = 0;
        while let Some(date) = cursor {
            if !self.state.checked_dates.contains(&date) {
                break;
            }
            if counts(&date) {
                total += 1;
            }
            cursor = date.pred();
        }
        total
    }

    /// Marks today as checked, awarding a repair credit when the real streak
    /// crosses a multiple of the award interval.
    pub fn check_in(&mut self) -> CheckInOutcome {
        if self.is_checked(self.today) {
            debug!(today = %self.today, "check-in ignored, already checked");
            return CheckInOutcome::AlreadyCheckedIn;
        }

        let previous = self.real_streak();
        self.state.checked_dates.insert(self.today);
        let next = self.real_streak();

        let repair_awarded = next / self.award_interval > previous / self.award_interval;
        if repair_awarded {
            self.state.repair_balance += 1;
            info!(
                real_streak = next,
                balance = self.state.repair_balance,
                "repair credit earned"
            );
        }
        debug_assert!(self.state.is_consistent());

        let streak = self.current_streak();
        info!(today = %self.today, streak, real_streak = next, "checked in");
        CheckInOutcome::CheckedIn {
            repair_awarded,
            streak,
            real_streak: next,
        }
    }

    /// Pure precondition check for [`repair_date`](Self::repair_date).
    pub fn can_repair(&self, date: CalendarDate) -> RepairDecision {
        if self.state.repair_balance == 0 {
            RepairDecision::NoCredits
        } else if date >= self.today {
            RepairDecision::NotInPast
        } else if self.is_checked(date) {
            RepairDecision::AlreadyChecked
        } else {
            RepairDecision::Allowed {
                balance_after: self.state.repair_balance - 1,
            }
        }
    }

    /// Spends one credit to mark a past missed day as checked and repaired.
    /// Nothing changes when the call fails.
    pub fn repair_date(&mut self, date: CalendarDate) -> Result<(), LedgerError> {
        match self.can_repair(date) {
            RepairDecision::NoCredits => return Err(LedgerError::InsufficientRepairs),
            RepairDecision::NotInPast => return Err(LedgerError::InvalidRepairTarget(date)),
            RepairDecision::AlreadyChecked => return Err(LedgerError::AlreadyChecked(date)),
            RepairDecision::Allowed { .. } => {}
        }

        self.state.repair_balance -= 1;
        self.state.checked_dates.insert(date);
        self.state.repaired_dates.insert(date);
        debug_assert!(self.state.is_consistent());

        info!(%date, balance = self.state.repair_balance, "day repaired");
        Ok(())
    }

    /// Replaces the whole state; used by seeding once its plan is validated.
    pub(crate) fn replace_state(&mut self, state: LedgerState) {
        debug_assert!(state.is_consistent(), "repaired dates must be checked");
        self.state = state;
    }
}
