use dialoguer::{theme::ColorfulTheme, Confirm};

use super::{calendar, output, CliError, GlobalOptions};
use crate::{
    config::{Config, ConfigManager},
    core::tracker::{Persisted, StreakTracker},
    ledger::{CalendarDate, CheckInOutcome, RepairDecision, SeedMark, SeedPlan},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Status,
    CheckIn,
    Repair(CalendarDate),
    Calendar {
        year: Option<i32>,
        month: Option<u32>,
    },
    Seed {
        start: CalendarDate,
        end: CalendarDate,
        skip: Vec<CalendarDate>,
        repaired: Vec<CalendarDate>,
    },
    Config {
        key: Option<String>,
        value: Option<String>,
    },
    Version,
    Help,
}

impl Command {
    pub fn parse(words: &[String]) -> Result<Self, CliError> {
        let Some((head, rest)) = words.split_first() else {
            return Ok(Command::Status);
        };
        match head.as_str() {
            "status" => Ok(Command::Status),
            "check-in" | "checkin" => Ok(Command::CheckIn),
            "repair" => {
                let raw = rest
                    .first()
                    .ok_or_else(|| CliError::Usage("repair needs a YYYY-MM-DD date".into()))?;
                Ok(Command::Repair(CalendarDate::parse(raw)?))
            }
            "calendar" => match rest.first() {
                None => Ok(Command::Calendar {
                    year: None,
                    month: None,
                }),
                Some(raw) => {
                    let (year, month) = parse_year_month(raw)?;
                    Ok(Command::Calendar {
                        year: Some(year),
                        month: Some(month),
                    })
                }
            },
            "seed" => parse_seed(rest),
            "config" => Ok(Command::Config {
                key: rest.first().cloned(),
                value: rest.get(1).cloned(),
            }),
            "version" | "--version" => Ok(Command::Version),
            "help" | "--help" | "-h" => Ok(Command::Help),
            other => Err(CliError::Usage(format!(
                "unknown command `{other}` (try `help`)"
            ))),
        }
    }
}

fn parse_year_month(raw: &str) -> Result<(i32, u32), CliError> {
    let invalid = || CliError::Usage(format!("invalid month `{raw}` (expected YYYY-MM)"));
    let (year, month) = raw.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

fn parse_seed(rest: &[String]) -> Result<Command, CliError> {
    let usage = || {
        CliError::Usage("seed <start> <end> [--skip DATE]... [--repair DATE]...".into())
    };
    let mut positional = Vec::new();
    let mut skip = Vec::new();
    let mut repaired = Vec::new();
    let mut iter = rest.iter();
    while let Some(word) = iter.next() {
        match word.as_str() {
            "--skip" => skip.push(CalendarDate::parse(iter.next().ok_or_else(usage)?)?),
            "--repair" => repaired.push(CalendarDate::parse(iter.next().ok_or_else(usage)?)?),
            _ => positional.push(CalendarDate::parse(word)?),
        }
    }
    match positional.as_slice() {
        [start, end] if start <= end => Ok(Command::Seed {
            start: *start,
            end: *end,
            skip,
            repaired,
        }),
        [_, _] => Err(CliError::Usage("seed start must not be after end".into())),
        _ => Err(usage()),
    }
}

pub fn dispatch(
    tracker: &mut StreakTracker,
    config: &Config,
    options: &GlobalOptions,
    command: Command,
) -> Result<(), CliError> {
    match command {
        Command::Status => {
            status(tracker);
            Ok(())
        }
        Command::CheckIn => {
            check_in(tracker);
            Ok(())
        }
        Command::Repair(date) => repair(tracker, config, options, date),
        Command::Calendar { year, month } => {
            let today = tracker.ledger().today();
            let grid = tracker
                .ledger()
                .month_grid(year.unwrap_or(today.year()), month.unwrap_or(today.month()))?;
            for line in calendar::render_month(&grid) {
                println!("{line}");
            }
            Ok(())
        }
        Command::Seed {
            start,
            end,
            skip,
            repaired,
        } => seed(tracker, start, end, &skip, &repaired),
        Command::Config { .. } | Command::Version | Command::Help => Err(CliError::Usage(
            "command does not operate on the ledger".into(),
        )),
    }
}

fn report_persistence(persisted: Persisted) {
    if let Persisted::Failed(message) = persisted {
        output::warning(format!("Could not save progress: {message}"));
    }
}

fn status(tracker: &StreakTracker) {
    let summary = tracker.summary();
    output::section(format!("Streak for {}", summary.today));
    println!("Current streak: {}", summary.current_streak);
    println!("Real streak:    {}", summary.real_streak);
    println!("Repairs:        {}", summary.repair_balance);
    println!(
        "Today:          {}",
        if summary.checked_today {
            "checked in"
        } else {
            "not checked in yet"
        }
    );
}

fn check_in(tracker: &mut StreakTracker) {
    let (outcome, persisted) = tracker.check_in();
    match outcome {
        CheckInOutcome::AlreadyCheckedIn => output::info("Already checked in today."),
        CheckInOutcome::CheckedIn {
            repair_awarded,
            streak,
            ..
        } => {
            output::success(format!("Checked in! Current streak: {streak}"));
            if repair_awarded {
                output::success(format!(
                    "Repair earned! You now have {}.",
                    tracker.ledger().repair_balance()
                ));
            }
        }
    }
    report_persistence(persisted);
}

fn repair(
    tracker: &mut StreakTracker,
    config: &Config,
    options: &GlobalOptions,
    date: CalendarDate,
) -> Result<(), CliError> {
    match tracker.ledger().can_repair(date) {
        RepairDecision::Allowed { .. } => {}
        RepairDecision::NoCredits => {
            return Err(CliError::Rejected("No repairs available.".into()));
        }
        RepairDecision::NotInPast => {
            return Err(CliError::Rejected(format!(
                "{date} is not in the past; only missed days can be repaired."
            )));
        }
        RepairDecision::AlreadyChecked => {
            return Err(CliError::Rejected(format!("{date} is already checked in.")));
        }
    }

    if config.confirm_repairs && !options.assume_yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Use 1 repair to restore streak for {date}? (Won't count toward new repairs)"
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            output::info("Repair cancelled.");
            return Ok(());
        }
    }

    let persisted = tracker.repair(date)?;
    let summary = tracker.summary();
    output::success(format!(
        "Streak restored! Current streak: {} ({} repairs left)",
        summary.current_streak, summary.repair_balance
    ));
    report_persistence(persisted);
    Ok(())
}

fn seed(
    tracker: &mut StreakTracker,
    start: CalendarDate,
    end: CalendarDate,
    skip: &[CalendarDate],
    repaired: &[CalendarDate],
) -> Result<(), CliError> {
    let mut plan = SeedPlan::new();
    plan.mark_range(start, end, SeedMark::Checked);
    for date in skip {
        plan.mark(*date, SeedMark::Unchecked);
    }
    for date in repaired {
        plan.mark(*date, SeedMark::Repaired);
    }

    let (report, persisted) = tracker.seed(&plan)?;
    output::success(format!(
        "Seeded {} checked days ({} repaired). Repairs available: {}",
        report.checked, report.repaired, report.repair_balance
    ));
    report_persistence(persisted);
    Ok(())
}

pub fn config(
    manager: &ConfigManager,
    mut config: Config,
    key: Option<&str>,
    value: Option<&str>,
) -> Result<(), CliError> {
    match (key, value) {
        (None, _) => {
            for key in Config::KEYS {
                println!("{key} = {}", config.get(key)?);
            }
        }
        (Some(key), None) => println!("{key} = {}", config.get(key)?),
        (Some(key), Some(value)) => {
            config.set(key, value)?;
            manager.save(&config)?;
            output::success(format!("{key} set to {}", config.get(key)?));
        }
    }
    Ok(())
}

pub fn print_usage() {
    println!(
        "Usage: streak_core_cli [--today YYYY-MM-DD] [--yes] <command>\n\n\
         Commands:\n  \
         status                         Show current and real streak, repairs left\n  \
         check-in                       Check in for today\n  \
         repair <date>                  Spend a repair on a missed past day\n  \
         calendar [YYYY-MM]             Show a month\n  \
         seed <start> <end> [--skip D]... [--repair D]...\n                                 \
         Replace history with a checked range\n  \
         config [key [value]]           Show or change settings\n  \
         version                        Show build information\n  \
         help                           Show this message"
    );
}

pub fn print_version() {
    println!(
        "streak_core {} ({} {}, built {} for {} [{}], {})",
        env!("CARGO_PKG_VERSION"),
        env!("STREAK_CORE_BUILD_HASH"),
        env!("STREAK_CORE_BUILD_STATUS"),
        env!("STREAK_CORE_BUILD_TIMESTAMP"),
        env!("STREAK_CORE_BUILD_TARGET"),
        env!("STREAK_CORE_BUILD_PROFILE"),
        env!("STREAK_CORE_BUILD_RUSTC"),
    );
}
