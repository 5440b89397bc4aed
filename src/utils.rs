use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike as _, Weekday};

use crate::consts::WORKING_HOUR;

pub fn is_weekend(date: &impl Datelike) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Whether `time` falls in the standard working hours of a weekday
pub fn is_working_hours(time: &DateTime<FixedOffset>) -> bool {
    !is_weekend(time) && (WORKING_HOUR.0..=WORKING_HOUR.1).contains(&time.hour())
}

/// Number of days a period spans, weekends included
///
/// A period starting and ending on the same date counts as a single day.
pub fn period_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().max(1)
}
