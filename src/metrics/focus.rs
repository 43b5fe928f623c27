use crate::metrics::types::FocusScoreBreakdown;

const CONSISTENCY_MAX: f64 = 40.0;
const TIME_ON_GOALS_MAX: f64 = 30.0;
const STREAK_MAX: f64 = 20.0;
const GOAL_COMPLETION_MAX: f64 = 10.0;

/// Inputs to the composite focus score.
#[derive(Debug, Clone, Default)]
pub struct FocusInputs {
    pub active_days: u64,
    pub total_days: u64,
    /// Tracked seconds on the single largest project.
    pub top_project_seconds: u64,
    pub total_seconds: u64,
    pub current_streak: u32,
    pub streak_target_days: u32,
    /// Mean of `min(1, current / target)` across goals in scope.
    pub goal_completion_ratio: f64,
}

/// Blend consistency, concentration, streak and goal progress into 0..=100.
///
/// Each part is rounded on its own before summing.
pub fn focus_score(inputs: &FocusInputs) -> FocusScoreBreakdown {
    let consistency = if inputs.total_days > 0 {
        inputs.active_days as f64 / inputs.total_days as f64 * CONSISTENCY_MAX
    } else {
        0.0
    };

    // Full marks once the top project holds half of all tracked time
    let time_on_goals = if inputs.total_seconds > 0 {
        (inputs.top_project_seconds as f64 / (inputs.total_seconds as f64 * 0.5)).min(1.0)
            * TIME_ON_GOALS_MAX
    } else {
        0.0
    };

    let streak_relative = if inputs.streak_target_days > 0 {
        (inputs.current_streak as f64 / inputs.streak_target_days as f64).min(1.0) * STREAK_MAX
    } else {
        0.0
    };

    let goal_completion = inputs.goal_completion_ratio.clamp(0.0, 1.0) * GOAL_COMPLETION_MAX;

    let consistency = part(consistency, CONSISTENCY_MAX);
    let time_on_goals = part(time_on_goals, TIME_ON_GOALS_MAX);
    let streak_relative = part(streak_relative, STREAK_MAX);
    let goal_completion = part(goal_completion, GOAL_COMPLETION_MAX);

    FocusScoreBreakdown {
        total: (consistency + time_on_goals + streak_relative + goal_completion).min(100),
        consistency,
        time_on_goals,
        streak_relative,
        goal_completion,
    }
}

fn part(v: f64, max: f64) -> u32 {
    v.round().clamp(0.0, max) as u32
}
