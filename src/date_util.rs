use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Get the last day of a given month.
pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next
        .map(|d| d - Duration::days(1))
        .unwrap_or(NaiveDate::MAX)
}

/// Midnight at the start of `d`.
pub fn start_of_day(d: NaiveDate) -> NaiveDateTime {
    d.and_time(NaiveTime::MIN)
}

/// Last representable millisecond of `d` (23:59:59.999).
pub fn end_of_day(d: NaiveDate) -> NaiveDateTime {
    start_of_day(d) + Duration::days(1) - Duration::milliseconds(1)
}

/// The Sunday on or before `d`.
pub fn start_of_week(d: NaiveDate) -> NaiveDate {
    d - Duration::days(d.weekday().num_days_from_sunday() as i64)
}

/// First day of the month containing `d`.
pub fn first_of_month(d: NaiveDate) -> NaiveDate {
    d.with_day(1).unwrap_or(d)
}
