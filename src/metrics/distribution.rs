use std::collections::HashMap;

use indexmap::IndexMap;

use crate::metrics::types::{CategoryDistribution, DistributionEntry, ProjectDistribution};
use crate::model::{Category, Project, Task, TimeEntry};
use crate::query::period::DateRange;

/// Display metadata for a project or category id.
struct Label<'a> {
    name: &'a str,
    color: Option<&'a str>,
}

#[derive(Default)]
struct Totals {
    time_seconds: u64,
    tasks_count: u64,
}

/// Tracked time and completed tasks per project within `range`.
pub fn project_distribution(
    range: &DateRange,
    tasks: &[&Task],
    time_entries: &[&TimeEntry],
    projects: &[Project],
) -> Vec<ProjectDistribution> {
    let labels: HashMap<&str, Label> = projects
        .iter()
        .map(|p| (p.id.as_str(), Label { name: &p.name, color: p.color.as_deref() }))
        .collect();
    distribute(
        range,
        tasks,
        time_entries,
        |t| t.project_id.as_deref().into_iter().collect(),
        |e| e.project_ids.iter().map(String::as_str).collect(),
        &labels,
    )
}

/// Tracked time and completed tasks per category within `range`.
///
/// A record tagged with several categories counts fully toward each one,
/// so task counts across categories can exceed the number of tasks.
pub fn category_distribution(
    range: &DateRange,
    tasks: &[&Task],
    time_entries: &[&TimeEntry],
    categories: &[Category],
) -> Vec<CategoryDistribution> {
    let labels: HashMap<&str, Label> = categories
        .iter()
        .map(|c| (c.id.as_str(), Label { name: &c.name, color: c.color.as_deref() }))
        .collect();
    distribute(
        range,
        tasks,
        time_entries,
        |t| t.category_ids.iter().map(String::as_str).collect(),
        |e| e.category_ids.iter().map(String::as_str).collect(),
        &labels,
    )
}

/// Group by key in encounter order, then sort by time descending (stable).
///
/// Ids with no matching label are dropped along with untagged records, so
/// percentages are shares of the time that could be attributed.
fn distribute<'e>(
    range: &DateRange,
    tasks: &[&'e Task],
    time_entries: &[&'e TimeEntry],
    task_keys: impl Fn(&'e Task) -> Vec<&'e str>,
    entry_keys: impl Fn(&'e TimeEntry) -> Vec<&'e str>,
    labels: &HashMap<&str, Label<'_>>,
) -> Vec<DistributionEntry> {
    let known = |k: &&str| labels.contains_key(*k);

    let totals = time_entries
        .iter()
        .filter(|e| e.start_time.coerce().is_some_and(|t| range.contains(t)))
        .flat_map(|e| entry_keys(*e).into_iter().filter(known).map(move |k| (k, e.duration)))
        .fold(IndexMap::<&str, Totals>::new(), |mut acc, (k, secs)| {
            acc.entry(k).or_default().time_seconds += secs;
            acc
        });

    let totals = tasks
        .iter()
        .filter(|t| t.completed)
        .filter(|t| {
            t.completed_at
                .as_ref()
                .and_then(|ts| ts.coerce())
                .is_some_and(|d| range.contains(d))
        })
        .flat_map(|t| task_keys(*t).into_iter().filter(known))
        .fold(totals, |mut acc, k| {
            acc.entry(k).or_default().tasks_count += 1;
            acc
        });

    let times: Vec<u64> = totals.values().map(|t| t.time_seconds).collect();
    let percentages = shares(&times);

    let mut entries: Vec<DistributionEntry> = totals
        .into_iter()
        .zip(percentages)
        .filter_map(|((id, t), percentage)| {
            let label = labels.get(id)?;
            Some(DistributionEntry {
                id: id.to_string(),
                name: label.name.to_string(),
                time_seconds: t.time_seconds,
                percentage,
                tasks_count: t.tasks_count,
                color: label.color.map(str::to_string),
            })
        })
        .collect();
    entries.sort_by(|a, b| b.time_seconds.cmp(&a.time_seconds));
    entries
}

/// Percent shares of `times` at two decimals, summing to exactly 100.00.
///
/// Largest-remainder rounding in hundredths of a percent: every share is
/// floored, then the leftover hundredths go to the largest remainders
/// (earlier entries win ties). All zeros when there is no time.
fn shares(times: &[u64]) -> Vec<f64> {
    const WHOLE: u128 = 10_000;

    let total: u128 = times.iter().map(|&t| t as u128).sum();
    if total == 0 {
        return vec![0.0; times.len()];
    }

    let mut units: Vec<u128> = times.iter().map(|&t| t as u128 * WHOLE / total).collect();
    let leftover = (WHOLE - units.iter().sum::<u128>()) as usize;

    let mut by_remainder: Vec<usize> = (0..times.len()).collect();
    by_remainder.sort_by_key(|&i| std::cmp::Reverse(times[i] as u128 * WHOLE % total));
    for &i in by_remainder.iter().take(leftover) {
        units[i] += 1;
    }

    units.into_iter().map(|u| u as f64 / 100.0).collect()
}
