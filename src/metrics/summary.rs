use crate::metrics::types::{DailyBucket, MetricDelta, PeriodStats, StatsComparison};

/// Reduce buckets to period totals.
pub fn summarize(buckets: &[DailyBucket]) -> PeriodStats {
    let stats = buckets.iter().fold(PeriodStats::default(), |mut acc, b| {
        acc.total_time_seconds += b.time_seconds;
        acc.tasks_completed += b.tasks_completed;
        acc.pomodoros_completed += b.pomodoros_completed;
        if b.is_active() {
            acc.active_days += 1;
        }
        acc
    });

    let total_days = buckets.len() as u64;
    PeriodStats {
        total_days,
        average_daily_seconds: if total_days > 0 {
            stats.total_time_seconds as f64 / total_days as f64
        } else {
            0.0
        },
        std_dev_hours: std_dev_hours(buckets),
        ..stats
    }
}

/// Population standard deviation of each bucket's tracked hours.
pub fn std_dev_hours(buckets: &[DailyBucket]) -> f64 {
    if buckets.is_empty() {
        return 0.0;
    }
    let n = buckets.len() as f64;
    let hours = buckets.iter().map(|b| b.time_seconds as f64 / 3600.0);
    let mean = hours.clone().sum::<f64>() / n;
    let variance = hours.map(|h| (h - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Current-vs-previous deltas for the headline totals.
pub fn compare(current: &PeriodStats, previous: &PeriodStats) -> StatsComparison {
    StatsComparison {
        total_time_seconds: delta(
            current.total_time_seconds as f64,
            previous.total_time_seconds as f64,
        ),
        tasks_completed: delta(current.tasks_completed as f64, previous.tasks_completed as f64),
        pomodoros_completed: delta(
            current.pomodoros_completed as f64,
            previous.pomodoros_completed as f64,
        ),
        active_days: delta(current.active_days as f64, previous.active_days as f64),
    }
}

fn delta(current: f64, previous: f64) -> MetricDelta {
    let change = current - previous;
    MetricDelta {
        current,
        previous,
        change,
        change_pct: if previous > 0.0 {
            Some(change / previous * 100.0)
        } else {
            None
        },
    }
}
