//! Calendar window math shared by the workload counter and conflict detector.
//!
//! Windows are closed `[start, end]` with `end` pinned to 23:59:59 of the last
//! day. Overlap between intervals is strict on both ends, so an interval that
//! ends exactly when another starts does not overlap it.

use chrono::{Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

const LAST_SECOND_OF_DAY: i64 = 86_399;

/// Closed calendar window used for workload counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    fn spanning(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            start: start_of_day(first),
            end: end_of_day(last),
        }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::seconds(LAST_SECOND_OF_DAY)
}

pub fn day_window(date: NaiveDate) -> TimeWindow {
    TimeWindow::spanning(date, date)
}

/// Monday through Sunday of the ISO week containing `date`, clamped to the
/// representable date range.
pub fn week_window(date: NaiveDate) -> TimeWindow {
    let since_monday = Days::new(u64::from(date.weekday().num_days_from_monday()));
    let monday = date.checked_sub_days(since_monday).unwrap_or(NaiveDate::MIN);
    let sunday = monday.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
    TimeWindow::spanning(monday, sunday)
}

pub fn month_window(date: NaiveDate) -> TimeWindow {
    let first = date.with_day(1).unwrap_or(date);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    TimeWindow::spanning(first, last)
}

/// `a_start < b_end && b_start < a_end`.
pub fn overlaps(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    a_start < b_end && b_start < a_end
}
