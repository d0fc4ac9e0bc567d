//! Onboarding history import.
//!
//! Seeding replaces the day sets wholesale and grants a starting balance
//! proportional to the genuine history. It never runs the per-check-in award
//! rule, so importing a long history cannot mass-award credits.

use std::collections::{btree_map, BTreeMap};

use tracing::info;

use super::{date::CalendarDate, state::LedgerState, streak::StreakLedger};
use crate::errors::LedgerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedMark {
    Unchecked,
    Checked,
    Repaired,
}

/// Caller-built mapping of days to their seeded mark.
#[derive(Debug, Clone, Default)]
pub struct SeedPlan {
    marks: BTreeMap<CalendarDate, SeedMark>,
}

impl SeedPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, date: CalendarDate, mark: SeedMark) -> &mut Self {
        self.marks.insert(date, mark);
        self
    }

    /// Marks every day from `start` to `end` inclusive.
    pub fn mark_range(
        &mut self,
        start: CalendarDate,
        end: CalendarDate,
        mark: SeedMark,
    ) -> &mut Self {
        let mut cursor = Some(start);
        while let Some(date) = cursor {
            if date > end {
                break;
            }
            self.marks.insert(date, mark);
            cursor = date.succ();
        }
        self
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, CalendarDate, SeedMark> {
        self.marks.iter()
    }
}

impl FromIterator<(CalendarDate, SeedMark)> for SeedPlan {
    fn from_iter<T: IntoIterator<Item = (CalendarDate, SeedMark)>>(iter: T) -> Self {
        Self {
            marks: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub checked: usize,
    pub repaired: usize,
    pub starting_grant: u32,
    pub repair_balance: u32,
}

impl StreakLedger {
    /// Replaces history with `plan`. The plan is validated before anything is
    /// touched, so a rejected plan leaves the ledger unchanged.
    pub fn seed(&mut self, plan: &SeedPlan) -> Result<SeedReport, LedgerError> {
        let today = self.today();
        for (date, mark) in plan.iter() {
            if *date > today && *mark != SeedMark::Unchecked {
                return Err(LedgerError::InvalidSeedDate {
                    date: *date,
                    reason: "seeded history cannot be in the future".into(),
                });
            }
            if *date == today && *mark == SeedMark::Repaired {
                return Err(LedgerError::InvalidSeedDate {
                    date: *date,
                    reason: "today can only be checked in, not repaired".into(),
                });
            }
        }

        let mut next = LedgerState {
            repair_balance: self.repair_balance(),
            ..LedgerState::default()
        };
        for (date, mark) in plan.iter() {
            match mark {
                SeedMark::Unchecked => {}
                SeedMark::Checked => {
                    next.checked_dates.insert(*date);
                }
                SeedMark::Repaired => {
                    next.checked_dates.insert(*date);
                    next.repaired_dates.insert(*date);
                }
            }
        }
        assert!(
            next.is_consistent(),
            "seeded repaired dates must also be checked"
        );

        let genuine = next.checked_dates.len() - next.repaired_dates.len();
        let starting_grant = u32::try_from(genuine).unwrap_or(u32::MAX) / self.award_interval();
        next.repair_balance = next.repair_balance.max(starting_grant);

        let report = SeedReport {
            checked: next.checked_dates.len(),
            repaired: next.repaired_dates.len(),
            starting_grant,
            repair_balance: next.repair_balance,
        };
        self.replace_state(next);
        info!(
            checked = report.checked,
            repaired = report.repaired,
            balance = report.repair_balance,
            "history seeded"
        );
        Ok(report)
    }
}
