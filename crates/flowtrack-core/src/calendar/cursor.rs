//! The month currently shown by the calendar view.

use chrono::{Datelike, NaiveDate};

use super::grid::{CalendarCell, layout, month_name, normalize_month};
use crate::domain::Task;

/// A `(year, 0-based month)` pair, always normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthCursor {
    year: i32,
    month: u32,
}

impl MonthCursor {
    pub fn new(year: i32, month: u32) -> Self {
        let (year, month) = normalize_month(year, month);
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month0())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Stays put at the first month of `i32::MIN`.
    pub fn previous(self) -> Self {
        match self.month {
            0 => self.year.checked_sub(1).map_or(self, |year| Self::new(year, 11)),
            m => Self::new(self.year, m - 1),
        }
    }

    /// Stays put at the last month of `i32::MAX`.
    pub fn next(self) -> Self {
        match self.month {
            11 => self.year.checked_add(1).map_or(self, |year| Self::new(year, 0)),
            m => Self::new(self.year, m + 1),
        }
    }

    /// e.g. `"February 2026"`
    pub fn title(&self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }

    pub fn layout<'a>(&self, tasks: &'a [Task], today: NaiveDate) -> Vec<CalendarCell<'a>> {
        layout(self.year, self.month, tasks, today)
    }
}
