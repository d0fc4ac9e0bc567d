use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};

use super::date::CalendarDate;
use crate::errors::LedgerError;

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// The persisted record: checked days, the repaired subset, and unused credits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerState {
    #[serde(default = "LedgerState::schema_version_default")]
    pub schema_version: u8,
    #[serde(default, deserialize_with = "date_set")]
    pub checked_dates: BTreeSet<CalendarDate>,
    #[serde(default, deserialize_with = "date_set")]
    pub repaired_dates: BTreeSet<CalendarDate>,
    #[serde(default, alias = "repairs")]
    pub repair_balance: u32,
}

impl Default for LedgerState {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            checked_dates: BTreeSet::new(),
            repaired_dates: BTreeSet::new(),
            repair_balance: 0,
        }
    }
}

impl LedgerState {
    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    /// True when every repaired date is also checked.
    pub fn is_consistent(&self) -> bool {
        self.repaired_dates.is_subset(&self.checked_dates)
    }

    /// Restores the subset invariant on a record read from storage by adding
    /// orphaned repaired dates to the checked set. Returns how many were fixed.
    pub fn normalize(&mut self) -> usize {
        let orphans: Vec<CalendarDate> = self
            .repaired_dates
            .difference(&self.checked_dates)
            .copied()
            .collect();
        self.checked_dates.extend(orphans.iter().copied());
        self.schema_version = CURRENT_SCHEMA_VERSION;
        orphans.len()
    }

    pub fn ensure_supported(&self) -> Result<(), LedgerError> {
        if self.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(LedgerError::UnsupportedSchema {
                found: self.schema_version,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }
        Ok(())
    }
}

/// Accepts either a list of date keys or the older `{ "YYYY-MM-DD": true }` map.
#[derive(Deserialize)]
#[serde(untagged)]
enum DateSetRepr {
    List(Vec<CalendarDate>),
    Flags(BTreeMap<CalendarDate, bool>),
}

fn date_set<'de, D>(deserializer: D) -> Result<BTreeSet<CalendarDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<DateSetRepr>::deserialize(deserializer)?;
    Ok(match repr {
        None => BTreeSet::new(),
        Some(DateSetRepr::List(dates)) => dates.into_iter().collect(),
        Some(DateSetRepr::Flags(flags)) => flags
            .into_iter()
            .filter_map(|(date, set)| set.then_some(date))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(raw: &str) -> CalendarDate {
        CalendarDate::parse(raw).unwrap()
    }

    #[test]
    fn writes_sorted_camel_case_record() {
        let mut state = LedgerState::default();
        state.checked_dates.insert(date("2026-01-02"));
        state.checked_dates.insert(date("2026-01-01"));
        state.repaired_dates.insert(date("2026-01-02"));
        state.repair_balance = 3;

        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(
            json,
            r#"{"schemaVersion":1,"checkedDates":["2026-01-01","2026-01-02"],"repairedDates":["2026-01-02"],"repairBalance":3}"#
        );
    }

    #[test]
    fn reads_legacy_flag_maps_and_repairs_alias() {
        let raw = r#"{
            "checkedDates": {"2026-01-01": true, "2026-01-02": true, "2026-01-03": false},
            "repairs": 2
        }"#;
        let state: LedgerState = serde_json::from_str(raw).unwrap();
        assert_eq!(state.checked_dates.len(), 2);
        assert!(state.repaired_dates.is_empty());
        assert_eq!(state.repair_balance, 2);
        assert_eq!(state.schema_version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn normalize_restores_subset_invariant() {
        let mut state = LedgerState::default();
        state.repaired_dates.insert(date("2026-01-05"));
        assert!(!state.is_consistent());

        assert_eq!(state.normalize(), 1);
        assert!(state.is_consistent());
        assert!(state.checked_dates.contains(&date("2026-01-05")));
    }

    #[test]
    fn rejects_newer_schema() {
        let state = LedgerState {
            schema_version: CURRENT_SCHEMA_VERSION + 1,
            ..LedgerState::default()
        };
        assert!(matches!(
            state.ensure_supported(),
            Err(LedgerError::UnsupportedSchema { .. })
        ));
    }
}
