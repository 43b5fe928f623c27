use std::sync::LazyLock;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::date_util::{end_of_day, first_of_month, last_day_of_month, start_of_day, start_of_week};
use crate::error::{Error, Result};

static RE_CUSTOM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})\s*\.\.\s*(\d{4}-\d{2}-\d{2})$").unwrap()
});

/// Named reporting range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeSelector {
    #[default]
    Week,
    Month,
    Year,
    Custom,
}

impl RangeSelector {
    /// Parse `week`, `month`, `year` or `custom` (case-insensitive).
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(RangeSelector::Week),
            "month" => Ok(RangeSelector::Month),
            "year" => Ok(RangeSelector::Year),
            "custom" => Ok(RangeSelector::Custom),
            other => Err(Error::PeriodParse(format!("unrecognized range: {other}"))),
        }
    }

    pub fn to_key(&self) -> &'static str {
        match self {
            RangeSelector::Week => "week",
            RangeSelector::Month => "month",
            RangeSelector::Year => "year",
            RangeSelector::Custom => "custom",
        }
    }
}

impl std::fmt::Display for RangeSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_key())
    }
}

/// An inclusive `[start, end]` interval of local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange(format!("{start} is after {end}")));
        }
        Ok(Self { start, end })
    }

    /// Whole calendar days `first` through `last`.
    pub fn whole_days(first: NaiveDate, last: NaiveDate) -> Result<Self> {
        Self::new(start_of_day(first), end_of_day(last))
    }

    /// The single day containing `now`.
    pub fn today(now: NaiveDateTime) -> Self {
        let d = now.date();
        Self {
            start: start_of_day(d),
            end: end_of_day(d),
        }
    }

    /// Parse `YYYY-MM-DD..YYYY-MM-DD` as a range of whole days.
    pub fn parse(s: &str) -> Result<Self> {
        let caps = RE_CUSTOM
            .captures(s.trim())
            .ok_or_else(|| Error::PeriodParse(format!("expected YYYY-MM-DD..YYYY-MM-DD: {s}")))?;
        let first = parse_date(&caps[1])?;
        let last = parse_date(&caps[2])?;
        Self::whole_days(first, last)
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, t: NaiveDateTime) -> bool {
        t >= self.start && t <= self.end
    }

    /// Calendar days touched by the range, first to last.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let last = self.end.date();
        self.start.date().iter_days().take_while(move |d| *d <= last)
    }

    /// `ceil(duration / 1 day)`, the divisor used for daily rates.
    pub fn span_days(&self) -> i64 {
        let ms = self.duration().num_milliseconds();
        let day = Duration::days(1).num_milliseconds();
        (ms + day - 1) / day
    }

    /// The interval of equal duration ending 1ms before `start`.
    pub fn previous(&self) -> Self {
        let end = self.start - Duration::milliseconds(1);
        Self {
            start: end - self.duration(),
            end,
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start.date(), self.end.date())
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| Error::PeriodParse(format!("invalid date: {s}")))
}

/// Turn a range selector into a concrete interval relative to `now`.
///
/// - `week`: Sunday through Saturday of the current week
/// - `month`: first through last day of the current month
/// - `year`: January 1 through December 31
/// - `custom`: `custom` verbatim, or today only when absent
pub fn resolve_period(
    selector: RangeSelector,
    custom: Option<DateRange>,
    now: NaiveDateTime,
) -> Result<DateRange> {
    let today = now.date();
    match selector {
        RangeSelector::Week => {
            let start = start_of_week(today);
            DateRange::whole_days(start, start + Duration::days(6))
        }
        RangeSelector::Month => DateRange::whole_days(
            first_of_month(today),
            last_day_of_month(today.year(), today.month()),
        ),
        RangeSelector::Year => {
            let first = NaiveDate::from_ymd_opt(today.year(), 1, 1)
                .ok_or_else(|| Error::InvalidRange(format!("year {}", today.year())))?;
            DateRange::whole_days(first, last_day_of_month(today.year(), 12))
        }
        RangeSelector::Custom => match custom {
            Some(r) => DateRange::new(r.start, r.end),
            None => Ok(DateRange::today(now)),
        },
    }
}
