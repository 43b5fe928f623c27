use chrono::NaiveDate;
use serde::Serialize;

/// One calendar day's aggregated activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub time_seconds: u64,
    pub tasks_completed: u64,
    pub pomodoros_completed: u64,
    pub intensity: f64,
}

impl DailyBucket {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            time_seconds: 0,
            tasks_completed: 0,
            pomodoros_completed: 0,
            intensity: 0.0,
        }
    }

    /// Any task, pomodoro or tracked time on this day.
    pub fn is_active(&self) -> bool {
        self.time_seconds > 0 || self.tasks_completed > 0 || self.pomodoros_completed > 0
    }
}

/// Period totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodStats {
    pub total_time_seconds: u64,
    pub tasks_completed: u64,
    pub pomodoros_completed: u64,
    pub active_days: u64,
    pub total_days: u64,
    pub average_daily_seconds: f64,
    /// Population standard deviation of daily tracked hours.
    pub std_dev_hours: f64,
}

/// Change of one metric between the previous and current period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricDelta {
    pub current: f64,
    pub previous: f64,
    pub change: f64,
    /// `None` when the previous value is zero.
    pub change_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsComparison {
    pub total_time_seconds: MetricDelta,
    pub tasks_completed: MetricDelta,
    pub pomodoros_completed: MetricDelta,
    pub active_days: MetricDelta,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StreakData {
    pub current: u32,
    pub max: u32,
    pub last_active_day: Option<NaiveDate>,
}

/// Share of tracked time and tasks for one project or category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionEntry {
    pub id: String,
    pub name: String,
    pub time_seconds: u64,
    pub percentage: f64,
    pub tasks_count: u64,
    pub color: Option<String>,
}

pub type ProjectDistribution = DistributionEntry;
pub type CategoryDistribution = DistributionEntry;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FocusScoreBreakdown {
    pub total: u32,
    pub consistency: u32,
    pub time_on_goals: u32,
    pub streak_relative: u32,
    pub goal_completion: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub goal_id: String,
    pub title: String,
    pub current: f64,
    pub target: f64,
    pub percentage: u32,
    pub average_rate: f64,
    pub projected_days_remaining: Option<i64>,
    pub on_track: bool,
}
