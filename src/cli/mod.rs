//! Command-line front end: argument parsing, prompts, and rendering over a
//! [`StreakTracker`].

pub mod calendar;
pub mod commands;
pub mod output;

use std::env;

use thiserror::Error;

use crate::{
    clock::{Clock, FixedClock, SystemClock},
    config::ConfigManager,
    core::tracker::StreakTracker,
    errors::{ConfigError, LedgerError},
    ledger::CalendarDate,
    storage::JsonStateStore,
};

pub use commands::Command;

/// Overrides the clock's day, mainly for scripted use.
pub const TODAY_ENV: &str = "STREAK_CORE_TODAY";

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Rejected(String),
}

/// Options that apply to every command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalOptions {
    pub today: Option<CalendarDate>,
    pub assume_yes: bool,
}

/// Splits global flags from the command words.
pub fn parse_args<I>(args: I) -> Result<(GlobalOptions, Vec<String>), CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut options = GlobalOptions::default();
    let mut rest = Vec::new();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--today" => {
                let raw = iter
                    .next()
                    .ok_or_else(|| CliError::Usage("--today needs a YYYY-MM-DD value".into()))?;
                options.today = Some(CalendarDate::parse(&raw)?);
            }
            "--yes" | "-y" => options.assume_yes = true,
            _ => rest.push(arg),
        }
    }
    if options.today.is_none() {
        if let Ok(raw) = env::var(TODAY_ENV) {
            options.today = Some(CalendarDate::parse(&raw)?);
        }
    }
    Ok((options, rest))
}

/// Entry point used by the `streak_core_cli` binary.
pub fn run_cli<I>(args: I) -> Result<(), CliError>
where
    I: IntoIterator<Item = String>,
{
    let (options, words) = parse_args(args)?;
    let command = Command::parse(&words)?;

    let config_manager = ConfigManager::new()?;
    let config = config_manager.load()?;
    output::set_color(config.color);

    match command {
        Command::Help => {
            commands::print_usage();
            Ok(())
        }
        Command::Version => {
            commands::print_version();
            Ok(())
        }
        Command::Config { key, value } => {
            commands::config(&config_manager, config, key.as_deref(), value.as_deref())
        }
        command => {
            let clock: Box<dyn Clock> = match options.today {
                Some(day) => Box::new(FixedClock(day)),
                None => Box::new(SystemClock),
            };
            let store = JsonStateStore::new_default()?;
            let mut tracker = StreakTracker::open(Box::new(store), clock.as_ref(), &config);
            commands::dispatch(&mut tracker, &config, &options, command)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|word| word.to_string()).collect()
    }

    #[test]
    fn global_flags_are_pulled_out_anywhere() {
        let (options, rest) =
            parse_args(words(&["repair", "--today", "2026-02-17", "2026-02-16", "-y"])).unwrap();
        assert_eq!(options.today, CalendarDate::from_ymd(2026, 2, 17));
        assert!(options.assume_yes);
        assert_eq!(rest, words(&["repair", "2026-02-16"]));
    }

    #[test]
    fn today_flag_requires_a_valid_date() {
        assert!(matches!(
            parse_args(words(&["status", "--today"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_args(words(&["status", "--today", "tomorrow"])),
            Err(CliError::Ledger(LedgerError::InvalidDate(_)))
        ));
    }
}
