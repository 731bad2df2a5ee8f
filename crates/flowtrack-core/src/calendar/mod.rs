//! Calendar - 月表示のグリッド
//!
//! 週は日曜始まり。1 日の曜日分だけ空セルを先に置き、その後に日ごとのセルを並べる。
//! タスクは `date` 文字列の完全一致で日に割り当てる。

pub mod cursor;
pub mod grid;

pub use self::cursor::MonthCursor;
pub use self::grid::{
    CalendarCell, DayCell, days_in_month, first_weekday_of_month, format_date, layout, month_name,
};
