use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::config::ScoringConfig;
use crate::metrics::types::DailyBucket;
use crate::model::{PomodoroSession, SessionType, Task, TimeEntry};
use crate::query::period::DateRange;
use crate::timestamp::Timestamp;

/// Build one bucket per calendar day of `range` and fold the activity into it.
///
/// Tasks count on the day they were completed, time entries on the day
/// they started, pomodoros (breaks excluded) on the day they finished.
/// Records outside `range` or with unreadable timestamps contribute nothing.
pub fn generate_buckets(
    range: &DateRange,
    tasks: &[&Task],
    time_entries: &[&TimeEntry],
    sessions: &[&PomodoroSession],
    config: &ScoringConfig,
) -> Vec<DailyBucket> {
    let days: BTreeMap<NaiveDate, DailyBucket> = range
        .days()
        .map(|d| (d, DailyBucket::empty(d)))
        .collect();

    let mut invalid = InvalidCounts::default();

    let days = tasks
        .iter()
        .filter(|t| t.completed)
        .filter_map(|t| match &t.completed_at {
            Some(ts) => day_in_range(range, ts, &mut invalid.tasks),
            None => {
                invalid.tasks += 1;
                None
            }
        })
        .fold(days, |mut acc, day| {
            if let Some(b) = acc.get_mut(&day) {
                b.tasks_completed += 1;
            }
            acc
        });

    let days = time_entries
        .iter()
        .filter_map(|e| day_in_range(range, &e.start_time, &mut invalid.time_entries).map(|d| (d, e.duration)))
        .fold(days, |mut acc, (day, secs)| {
            if let Some(b) = acc.get_mut(&day) {
                b.time_seconds += secs;
            }
            acc
        });

    let days = sessions
        .iter()
        .filter(|s| s.session_type == SessionType::Pomodoro)
        .filter_map(|s| day_in_range(range, &s.completed_at, &mut invalid.sessions))
        .fold(days, |mut acc, day| {
            if let Some(b) = acc.get_mut(&day) {
                b.pomodoros_completed += 1;
            }
            acc
        });

    invalid.report();

    let buckets: Vec<DailyBucket> = days
        .into_values()
        .map(|mut b| {
            b.intensity = intensity(&b, config);
            log::trace!(
                "{}: {}s, {} tasks, {} pomodoros, intensity {:.2}",
                b.date,
                b.time_seconds,
                b.tasks_completed,
                b.pomodoros_completed,
                b.intensity
            );
            b
        })
        .collect();

    log::trace!("Generated {} buckets for {range}", buckets.len());
    buckets
}

/// `tasks * task_weight + pomodoros * pomodoro_weight + hours * hour_weight`.
pub fn intensity(b: &DailyBucket, config: &ScoringConfig) -> f64 {
    b.tasks_completed as f64 * config.task_weight
        + b.pomodoros_completed as f64 * config.pomodoro_weight
        + (b.time_seconds as f64 / 3600.0) * config.hour_weight
}

fn day_in_range(range: &DateRange, ts: &Timestamp, invalid: &mut usize) -> Option<NaiveDate> {
    match ts.coerce() {
        Some(t) if range.contains(t) => Some(t.date()),
        Some(_) => None,
        None => {
            *invalid += 1;
            None
        }
    }
}

#[derive(Default)]
struct InvalidCounts {
    tasks: usize,
    time_entries: usize,
    sessions: usize,
}

impl InvalidCounts {
    fn report(&self) {
        for (kind, n) in [
            ("completed tasks", self.tasks),
            ("time entries", self.time_entries),
            ("pomodoro sessions", self.sessions),
        ] {
            if n > 0 {
                log::warn!("Skipped {n} {kind} with unreadable timestamps");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDateTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(d: NaiveDate, h: u32) -> Timestamp {
        Timestamp::Native(d.and_hms_opt(h, 0, 0).unwrap())
    }

    fn task(when: Option<Timestamp>, completed: bool) -> Task {
        Task {
            id: "t".into(),
            completed,
            completed_at: when,
            project_id: None,
            category_ids: vec![],
        }
    }

    fn entry(when: Timestamp, duration: u64) -> TimeEntry {
        TimeEntry {
            start_time: when,
            duration,
            project_ids: vec![],
            category_ids: vec![],
        }
    }

    fn session(kind: SessionType, when: Timestamp) -> PomodoroSession {
        PomodoroSession {
            session_type: kind,
            completed_at: when,
        }
    }

    fn week() -> DateRange {
        // Sunday 2025-01-12 through Saturday 2025-01-18
        DateRange::whole_days(date(2025, 1, 12), date(2025, 1, 18)).unwrap()
    }

    #[test]
    fn test_one_bucket_per_day_contiguous() {
        let range = DateRange::whole_days(date(2024, 2, 20), date(2024, 3, 5)).unwrap();
        let buckets = generate_buckets(&range, &[], &[], &[], &ScoringConfig::default());
        assert_eq!(buckets.len(), 15); // leap February
        for pair in buckets.windows(2) {
            assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
        }
        assert_eq!(buckets.first().unwrap().date, date(2024, 2, 20));
        assert_eq!(buckets.last().unwrap().date, date(2024, 3, 5));
    }

    #[test]
    fn test_partial_day_bounds_still_cover_both_days() {
        let start: NaiveDateTime = date(2025, 1, 1).and_hms_opt(18, 0, 0).unwrap();
        let end: NaiveDateTime = date(2025, 1, 3).and_hms_opt(6, 0, 0).unwrap();
        let range = DateRange::new(start, end).unwrap();
        let buckets = generate_buckets(&range, &[], &[], &[], &ScoringConfig::default());
        let dates: Vec<NaiveDate> = buckets.iter().map(|b| b.date).collect();
        assert_eq!(dates, vec![date(2025, 1, 1), date(2025, 1, 2), date(2025, 1, 3)]);
    }

    #[test]
    fn test_single_entry_on_monday() {
        let monday = date(2025, 1, 13);
        let entries = [entry(at(monday, 9), 3600)];
        let refs: Vec<&TimeEntry> = entries.iter().collect();
        let buckets = generate_buckets(&week(), &[], &refs, &[], &ScoringConfig::default());

        assert_eq!(buckets.len(), 7);
        for b in &buckets {
            if b.date == monday {
                assert_eq!(b.time_seconds, 3600);
                assert_eq!(b.intensity, 0.5);
                assert_eq!(b.tasks_completed, 0);
                assert_eq!(b.pomodoros_completed, 0);
            } else {
                assert_eq!(*b, DailyBucket::empty(b.date));
            }
        }
    }

    #[test]
    fn test_folds_tasks_sessions_and_intensity() {
        let tue = date(2025, 1, 14);
        let tasks = [
            task(Some(at(tue, 10)), true),
            task(Some(at(tue, 11)), true),
            task(Some(at(tue, 12)), false),
            task(None, true),
        ];
        let sessions = [
            session(SessionType::Pomodoro, at(tue, 9)),
            session(SessionType::ShortBreak, at(tue, 9)),
            session(SessionType::LongBreak, at(tue, 10)),
        ];
        let entries = [entry(at(tue, 8), 1800), entry(at(tue, 13), 1800)];

        let t: Vec<&Task> = tasks.iter().collect();
        let s: Vec<&PomodoroSession> = sessions.iter().collect();
        let e: Vec<&TimeEntry> = entries.iter().collect();
        let buckets = generate_buckets(&week(), &t, &e, &s, &ScoringConfig::default());

        let b = buckets.iter().find(|b| b.date == tue).unwrap();
        assert_eq!(b.tasks_completed, 2);
        assert_eq!(b.pomodoros_completed, 1);
        assert_eq!(b.time_seconds, 3600);
        assert!((b.intensity - (2.0 + 0.8 + 0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_and_invalid_ignored() {
        let entries = [
            entry(at(date(2025, 1, 11), 23), 100), // Saturday before
            entry(at(date(2025, 1, 19), 0), 200),  // Sunday after
            entry(Timestamp::Native(week().end), 300),
            entry(Timestamp::Native(week().start), 400),
            entry(Timestamp::Text("bogus".into()), 500),
        ];
        let refs: Vec<&TimeEntry> = entries.iter().collect();
        let buckets = generate_buckets(&week(), &[], &refs, &[], &ScoringConfig::default());

        let total: u64 = buckets.iter().map(|b| b.time_seconds).sum();
        assert_eq!(total, 700);
        assert_eq!(buckets[0].time_seconds, 400);
        assert_eq!(buckets[6].time_seconds, 300);
    }

    #[test]
    fn test_custom_weights() {
        let config = ScoringConfig {
            task_weight: 2.0,
            hour_weight: 1.0,
            ..Default::default()
        };
        let b = DailyBucket {
            date: date(2025, 1, 1),
            time_seconds: 7200,
            tasks_completed: 3,
            pomodoros_completed: 0,
            intensity: 0.0,
        };
        assert_eq!(intensity(&b, &config), 8.0);
    }
}
