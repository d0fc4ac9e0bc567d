use chrono::{Datelike, NaiveDate};

use super::{date::CalendarDate, streak::StreakLedger};
use crate::errors::LedgerError;

/// How a single day should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    Checked,
    Repaired,
    /// Past, unchecked, and at least one credit is available.
    MissedRepairable,
    Missed,
    Today,
    TodayChecked,
    Future,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: CalendarDate,
    pub status: DayStatus,
}

/// One month laid out in Sunday-first weeks; `None` pads the first week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<Vec<Option<DayCell>>>,
}

impl StreakLedger {
    pub fn day_status(&self, date: CalendarDate) -> DayStatus {
        let today = self.today();
        if date == today {
            return if self.is_checked(date) {
                DayStatus::TodayChecked
            } else {
                DayStatus::Today
            };
        }
        if self.is_repaired(date) {
            DayStatus::Repaired
        } else if self.is_checked(date) {
            DayStatus::Checked
        } else if date > today {
            DayStatus::Future
        } else if self.repair_balance() > 0 {
            DayStatus::MissedRepairable
        } else {
            DayStatus::Missed
        }
    }

    pub fn month_grid(&self, year: i32, month: u32) -> Result<MonthGrid, LedgerError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| LedgerError::InvalidDate(format!("{year:04}-{month:02}")))?;
        let padding = first.weekday().num_days_from_sunday() as usize;

        let mut cells: Vec<Option<DayCell>> = vec![None; padding];
        let mut cursor = Some(CalendarDate::new(first));
        while let Some(date) = cursor {
            if date.month() != month {
                break;
            }
            cells.push(Some(DayCell {
                date,
                status: self.day_status(date),
            }));
            cursor = date.succ();
        }

        let weeks = cells.chunks(7).map(|week| week.to_vec()).collect();
        Ok(MonthGrid { year, month, weeks })
    }
}
