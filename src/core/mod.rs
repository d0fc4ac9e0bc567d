pub mod tracker;

pub use tracker::{Persisted, StreakSummary, StreakTracker};
