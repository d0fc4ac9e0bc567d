use chrono::Month;
use colored::{ColoredString, Colorize};

use crate::ledger::{DayCell, DayStatus, MonthGrid};

const WEEKDAY_HEADER: &str = " Su  Mo  Tu  We  Th  Fr  Sa";
const LEGEND: &str = "+ checked  ~ repaired  ? repairable  . missed  * today";

fn marker(status: DayStatus) -> char {
    match status {
        DayStatus::Checked | DayStatus::TodayChecked => '+',
        DayStatus::Repaired => '~',
        DayStatus::MissedRepairable => '?',
        DayStatus::Missed => '.',
        DayStatus::Today => '*',
        DayStatus::Future => ' ',
    }
}

fn paint(cell: &DayCell) -> ColoredString {
    let text = format!("{:>3}{}", cell.date.day(), marker(cell.status));
    match cell.status {
        DayStatus::Checked => text.green(),
        DayStatus::TodayChecked => text.green().bold(),
        DayStatus::Repaired => text.yellow(),
        DayStatus::MissedRepairable => text.red(),
        DayStatus::Missed => text.dimmed(),
        DayStatus::Today => text.cyan().bold(),
        DayStatus::Future => text.normal(),
    }
}

/// Renders a month grid as text lines: title, weekday header, weeks, legend.
pub fn render_month(grid: &MonthGrid) -> Vec<String> {
    let title = u8::try_from(grid.month)
        .ok()
        .and_then(|month| Month::try_from(month).ok())
        .map(|month| format!("{} {}", month.name(), grid.year))
        .unwrap_or_else(|| format!("{:04}-{:02}", grid.year, grid.month));

    let mut lines = vec![title, WEEKDAY_HEADER.to_string()];
    for week in &grid.weeks {
        let row: String = week
            .iter()
            .map(|cell| match cell {
                Some(cell) => paint(cell).to_string(),
                None => "    ".to_string(),
            })
            .collect();
        lines.push(row.trim_end().to_string());
    }
    lines.push(LEGEND.to_string());
    lines
}
