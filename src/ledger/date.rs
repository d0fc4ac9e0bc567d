use std::{fmt, str::FromStr};

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::LedgerError;

const KEY_FORMAT: &str = "%Y-%m-%d";

/// A calendar day without time-of-day, keyed canonically as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Current local day, normalized to midnight granularity.
    pub fn today_local() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn parse(raw: &str) -> Result<Self, LedgerError> {
        let trimmed = raw.trim();
        // chrono tolerates unpadded fields; keys must be exactly ten characters
        if trimmed.len() != 10 {
            return Err(LedgerError::InvalidDate(raw.to_string()));
        }
        NaiveDate::parse_from_str(trimmed, KEY_FORMAT)
            .map(Self)
            .map_err(|_| LedgerError::InvalidDate(raw.to_string()))
    }

    pub fn key(&self) -> String {
        self.0.format(KEY_FORMAT).to_string()
    }

    pub fn pred(&self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    pub fn succ(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(KEY_FORMAT))
    }
}

impl FromStr for CalendarDate {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_keys_only() {
        let date = CalendarDate::parse("2026-02-13").unwrap();
        assert_eq!(date.key(), "2026-02-13");
        assert!(CalendarDate::parse("2026-2-13").is_err());
        assert!(CalendarDate::parse("2026-02-30").is_err());
        assert!(CalendarDate::parse("13/02/2026").is_err());
    }

    #[test]
    fn steps_across_month_and_year_boundaries() {
        let first = CalendarDate::from_ymd(2026, 1, 1).unwrap();
        assert_eq!(first.pred().unwrap().key(), "2025-12-31");
        let leap = CalendarDate::from_ymd(2024, 2, 28).unwrap();
        assert_eq!(leap.succ().unwrap().key(), "2024-02-29");
    }

    #[test]
    fn serializes_as_key_string() {
        let date = CalendarDate::from_ymd(2026, 3, 9).unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"2026-03-09\"");
        let back: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date);
    }
}
