use chrono::NaiveDateTime;
use serde::Serialize;

use crate::config::ScoringConfig;
use crate::error::Result;
use crate::metrics::{
    self, CategoryDistribution, DailyBucket, FocusInputs, FocusScoreBreakdown, GoalProgress,
    PeriodStats, ProjectDistribution, StatsComparison, StreakData,
};
use crate::model::{EntitySet, Goal};
use crate::query::period::{resolve_period, DateRange};
use crate::query::scope::{apply_scope, ReportFilters, ScopedEntities};

/// A human-readable observation derived from a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: String,
    pub message: String,
}

/// Turns a computed report into insights. Implemented outside this crate.
pub trait InsightGenerator {
    fn generate(&self, report: &ReportData) -> Vec<Insight>;
}

/// Generator that produces nothing.
pub struct NoInsights;

impl InsightGenerator for NoInsights {
    fn generate(&self, _report: &ReportData) -> Vec<Insight> {
        Vec::new()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsistencyBlock {
    pub streak: StreakData,
    pub focus_score: FocusScoreBreakdown,
    pub active_days: u64,
    pub total_days: u64,
    pub std_dev_hours: f64,
}

/// The full report for one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportData {
    pub period: DateRange,
    pub previous_period: Option<DateRange>,
    pub stats: PeriodStats,
    pub previous_stats: Option<PeriodStats>,
    pub comparison: Option<StatsComparison>,
    pub consistency: ConsistencyBlock,
    pub daily_buckets: Vec<DailyBucket>,
    pub project_distribution: Vec<ProjectDistribution>,
    pub category_distribution: Vec<CategoryDistribution>,
    pub goal_progress: Vec<GoalProgress>,
    pub insights: Vec<Insight>,
}

/// Compute a report from scratch.
///
/// Deterministic for identical inputs and `now`; nothing is cached between calls.
pub fn compute_report(
    filters: &ReportFilters,
    entities: &EntitySet,
    now: NaiveDateTime,
    config: &ScoringConfig,
    insights: &dyn InsightGenerator,
) -> Result<ReportData> {
    let period = resolve_period(filters.range, filters.custom_range, now)?;
    log::debug!("Computing {} report for {period}", filters.range);

    let scoped = apply_scope(filters, entities)?;
    let buckets = buckets_for(&period, &scoped, config);
    let stats = metrics::summarize(&buckets);
    log::debug!(
        "{} buckets, {} active, {}s tracked",
        buckets.len(),
        stats.active_days,
        stats.total_time_seconds
    );

    let (previous_period, previous_stats) = if filters.compare_with_previous {
        let previous = period.previous();
        let previous_stats = metrics::summarize(&buckets_for(&previous, &scoped, config));
        (Some(previous), Some(previous_stats))
    } else {
        (None, None)
    };
    let comparison = previous_stats
        .as_ref()
        .map(|prev| metrics::compare(&stats, prev));

    let streak = metrics::compute_streak(&scoped.tasks, now.date());
    let project_distribution =
        metrics::project_distribution(&period, &scoped.tasks, &scoped.time_entries, &entities.projects);
    let category_distribution = metrics::category_distribution(
        &period,
        &scoped.tasks,
        &scoped.time_entries,
        &entities.categories,
    );

    let active_goals: Vec<&Goal> = scoped.goals.iter().copied().filter(|g| g.is_active()).collect();
    let goal_progress = metrics::project_goals(&active_goals, &period, config);

    let focus_score = metrics::focus_score(&FocusInputs {
        active_days: stats.active_days,
        total_days: stats.total_days,
        top_project_seconds: project_distribution.first().map_or(0, |p| p.time_seconds),
        total_seconds: stats.total_time_seconds,
        current_streak: streak.current,
        streak_target_days: config.streak_target_days,
        goal_completion_ratio: metrics::mean_completion(&scoped.goals),
    });

    let mut report = ReportData {
        period,
        previous_period,
        consistency: ConsistencyBlock {
            streak,
            focus_score,
            active_days: stats.active_days,
            total_days: stats.total_days,
            std_dev_hours: stats.std_dev_hours,
        },
        stats,
        previous_stats,
        comparison,
        daily_buckets: buckets,
        project_distribution,
        category_distribution,
        goal_progress,
        insights: Vec::new(),
    };
    report.insights = insights.generate(&report);
    Ok(report)
}

fn buckets_for(range: &DateRange, scoped: &ScopedEntities<'_>, config: &ScoringConfig) -> Vec<DailyBucket> {
    metrics::generate_buckets(
        range,
        &scoped.tasks,
        &scoped.time_entries,
        &scoped.sessions,
        config,
    )
}
