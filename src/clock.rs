use chrono::{DateTime, Local, TimeZone};

use crate::ledger::CalendarDate;

/// Clock abstracts access to the current moment so sessions remain
/// deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current local timestamp.
    fn now(&self) -> DateTime<Local>;

    /// Returns the current local day. Defaults to `now().date_naive()`.
    fn today(&self) -> CalendarDate {
        CalendarDate::new(self.now().date_naive())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn today(&self) -> CalendarDate {
        CalendarDate::today_local()
    }
}

/// Clock pinned to local midnight of a given day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub CalendarDate);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
            .naive()
            .and_hms_opt(0, 0, 0)
            .and_then(|midnight| Local.from_local_datetime(&midnight).earliest())
            .unwrap_or_else(Local::now)
    }

    fn today(&self) -> CalendarDate {
        self.0
    }
}
