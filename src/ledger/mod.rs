//! Streak ledger domain: calendar days, the persisted record, and the engine
//! that derives streaks and spends repair credits.

pub mod date;
pub mod day_status;
pub mod seed;
pub mod state;
pub mod streak;

pub use date::CalendarDate;
pub use day_status::{DayCell, DayStatus, MonthGrid};
pub use seed::{SeedMark, SeedPlan, SeedReport};
pub use state::{LedgerState, CURRENT_SCHEMA_VERSION};
pub use streak::{CheckInOutcome, RepairDecision, StreakLedger, DEFAULT_AWARD_INTERVAL};
