use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};

use crate::metrics::types::StreakData;
use crate::model::Task;

/// Streaks over days with at least one completed task.
///
/// The current streak is the run ending today, or ending yesterday when
/// nothing has been completed yet today; anything older counts as broken.
pub fn compute_streak(tasks: &[&Task], today: NaiveDate) -> StreakData {
    let active: BTreeSet<NaiveDate> = tasks
        .iter()
        .filter(|t| t.completed)
        .filter_map(|t| t.completed_at.as_ref().and_then(|ts| ts.date()))
        .collect();

    let Some(&last_active_day) = active.last() else {
        return StreakData::default();
    };

    let (max, _, _) = active.iter().fold(
        (0u32, 0u32, None::<NaiveDate>),
        |(max, run, prev), &day| {
            let run = match prev {
                Some(p) if day - p == Duration::days(1) => run + 1,
                _ => 1,
            };
            (max.max(run), run, Some(day))
        },
    );

    let yesterday = today - Duration::days(1);
    let anchor = if active.contains(&today) {
        Some(today)
    } else if active.contains(&yesterday) {
        Some(yesterday)
    } else {
        None
    };
    let current = anchor.map_or(0, |end| {
        std::iter::successors(Some(end), |d| d.pred_opt())
            .take_while(|d| active.contains(d))
            .count() as u32
    });

    StreakData {
        current,
        max: max.max(current),
        last_active_day: Some(last_active_day),
    }
}
