pub mod config;
pub mod date_util;
pub mod error;
pub mod metrics;
pub mod model;
pub mod query;
pub mod report;
pub mod storage;
pub mod timestamp;

pub use config::ScoringConfig;
pub use error::{Error, Result};
pub use metrics::{
    CategoryDistribution, DailyBucket, FocusScoreBreakdown, GoalProgress, PeriodStats,
    ProjectDistribution, StatsComparison, StreakData,
};
pub use model::{
    Category, EntitySet, Goal, GoalKind, GoalStatus, PomodoroSession, Project, SessionType, Task,
    TimeEntry,
};
pub use query::period::{resolve_period, DateRange, RangeSelector};
pub use query::scope::{ReportFilters, Scope};
pub use report::{compute_report, ConsistencyBlock, Insight, InsightGenerator, NoInsights, ReportData};
pub use storage::Snapshot;
pub use timestamp::Timestamp;

use chrono::NaiveDateTime;

/// Main entry point for computing productivity reports.
pub struct FocusReport {
    config: ScoringConfig,
    insights: Box<dyn InsightGenerator>,
}

impl FocusReport {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            insights: Box::new(NoInsights),
        }
    }

    /// Attach the generator that fills `ReportData::insights`.
    pub fn with_insights(mut self, generator: impl InsightGenerator + 'static) -> Self {
        self.insights = Box::new(generator);
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Compute the report selected by `filters` as of `now`.
    pub fn compute(
        &self,
        filters: &ReportFilters,
        entities: &EntitySet,
        now: NaiveDateTime,
    ) -> Result<ReportData> {
        compute_report(filters, entities, now, &self.config, self.insights.as_ref())
    }
}

impl Default for FocusReport {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}
