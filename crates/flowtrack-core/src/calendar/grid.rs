//! Month grid layout.
//!
//! Months are 0-based (`0` = January) and overflow into the following years,
//! so `(2025, 12)` is January 2026. All functions are pure.

use chrono::{Datelike, NaiveDate};

use crate::domain::Task;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Folds a month overflow into the year. The year saturates at `i32::MAX`.
pub fn normalize_month(year: i32, month: u32) -> (i32, u32) {
    let carry = i32::try_from(month / 12).unwrap_or(i32::MAX);
    (year.saturating_add(carry), month % 12)
}

fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (year, month) = normalize_month(year, month);
    NaiveDate::from_ymd_opt(year, month + 1, 1)
}

/// Number of days in the month: the day before the first of next month.
/// Years outside the supported calendar range yield 0.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    month
        .checked_add(1)
        .and_then(|next| first_of_month(year, next))
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(0)
}

/// Weekday of the 1st, `0` = Sunday.
pub fn first_weekday_of_month(year: i32, month: u32) -> u32 {
    first_of_month(year, month)
        .map(|first| first.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

/// `YYYY-MM-DD` for a 0-based month.
pub fn format_date(year: i32, month: u32, day: u32) -> String {
    let (year, month) = normalize_month(year, month);
    format!("{year}-{:02}-{day:02}", month + 1)
}

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month % 12) as usize]
}

/// One day of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCell<'a> {
    pub day: u32,
    /// `YYYY-MM-DD`
    pub date: String,
    pub is_today: bool,
    pub tasks: Vec<&'a Task>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CalendarCell<'a> {
    /// Padding before the 1st so it lands on its weekday column.
    Empty,
    Day(DayCell<'a>),
}

impl<'a> CalendarCell<'a> {
    pub fn as_day(&self) -> Option<&DayCell<'a>> {
        match self {
            CalendarCell::Day(day) => Some(day),
            CalendarCell::Empty => None,
        }
    }
}

/// Leading empty cells, then one cell per day with the tasks whose `date`
/// string is exactly that day's `YYYY-MM-DD`.
pub fn layout<'a>(year: i32, month: u32, tasks: &'a [Task], today: NaiveDate) -> Vec<CalendarCell<'a>> {
    let (year, month) = normalize_month(year, month);
    let leading = first_weekday_of_month(year, month);
    let days = days_in_month(year, month);

    let mut cells = Vec::with_capacity((leading + days) as usize);
    cells.extend((0..leading).map(|_| CalendarCell::Empty));
    for day in 1..=days {
        let date = format_date(year, month, day);
        let is_today =
            today.year() == year && today.month0() == month && today.day() == day;
        let day_tasks = tasks.iter().filter(|t| t.date == date).collect();
        cells.push(CalendarCell::Day(DayCell {
            day,
            date,
            is_today,
            tasks: day_tasks,
        }));
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, TaskExtras, TaskId};
    use chrono::Utc;
    use rstest::rstest;

    fn task(title: &str, date: &str) -> Task {
        Task::new_local(
            TaskId::Temp(0),
            title,
            Priority::Medium,
            date,
            TaskExtras::default(),
            Utc::now(),
        )
    }

    #[rstest]
    #[case(2026, 1, 28)]
    #[case(2024, 1, 29)]
    #[case(2000, 1, 29)]
    #[case(1900, 1, 28)]
    #[case(2026, 0, 31)]
    #[case(2026, 3, 30)]
    #[case(2025, 12, 31)]
    #[case(2026, 11, 31)]
    #[case(2026, u32::MAX, 0)]
    #[case(i32::MAX, 11, 0)]
    #[case(i32::MIN, 0, 0)]
    fn days_in_month_table(#[case] year: i32, #[case] month: u32, #[case] expected: u32) {
        assert_eq!(days_in_month(year, month), expected);
    }

    #[rstest]
    #[case(2026, 1, 0)]
    #[case(2026, 9, 4)]
    #[case(2026, 0, 4)]
    fn first_weekday_table(#[case] year: i32, #[case] month: u32, #[case] expected: u32) {
        assert_eq!(first_weekday_of_month(year, month), expected);
    }

    #[test]
    fn february_2026_layout() {
        let tasks = vec![
            task("Payment UI", "2026-02-05"),
            task("Review mockups", "2026-02-04"),
            task("Also on the 5th", "2026-02-05"),
            task("Wrong month", "2026-03-05"),
            task("Unpadded", "2026-2-5"),
        ];
        let today = NaiveDate::from_ymd_opt(2026, 2, 6).unwrap();
        let cells = layout(2026, 1, &tasks, today);

        assert_eq!(cells.len(), 28);
        assert!(cells.iter().all(|c| c.as_day().is_some()));

        let fifth = cells[4].as_day().unwrap();
        assert_eq!(fifth.date, "2026-02-05");
        let titles: Vec<_> = fifth.tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Payment UI", "Also on the 5th"]);

        let total: usize = cells.iter().filter_map(|c| c.as_day()).map(|d| d.tasks.len()).sum();
        assert_eq!(total, 3);

        let todays: Vec<_> = cells
            .iter()
            .filter_map(|c| c.as_day())
            .filter(|d| d.is_today)
            .map(|d| d.day)
            .collect();
        assert_eq!(todays, [6]);
    }

    #[test]
    fn leading_cells_match_first_weekday() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 6).unwrap();
        let cells = layout(2026, 9, &[], today);
        assert_eq!(cells.len(), 4 + 31);
        assert!(cells[..4].iter().all(|c| *c == CalendarCell::Empty));
        assert_eq!(cells[4].as_day().unwrap().day, 1);
        assert!(cells.iter().filter_map(|c| c.as_day()).all(|d| !d.is_today));
    }

    #[test]
    fn format_date_pads_and_normalizes() {
        assert_eq!(format_date(2026, 1, 5), "2026-02-05");
        assert_eq!(format_date(2025, 12, 31), "2026-01-31");
        assert_eq!(month_name(1), "February");
    }

    #[test]
    fn out_of_range_years_give_an_empty_grid() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 6).unwrap();
        assert_eq!(normalize_month(i32::MAX, 12), (i32::MAX, 0));
        assert!(layout(i32::MAX, u32::MAX, &[], today).is_empty());
        assert_eq!(first_weekday_of_month(i32::MIN, 0), 0);
    }
}
