use crate::config::ScoringConfig;
use crate::metrics::types::GoalProgress;
use crate::model::Goal;
use crate::query::period::DateRange;

/// Progress and projected completion for each active goal.
pub fn project_goals(goals: &[&Goal], range: &DateRange, config: &ScoringConfig) -> Vec<GoalProgress> {
    let days_in_period = range.span_days().max(1) as f64;
    goals
        .iter()
        .filter(|g| g.is_active())
        .map(|g| goal_progress(g, days_in_period, config))
        .collect()
}

fn goal_progress(goal: &Goal, days_in_period: f64, config: &ScoringConfig) -> GoalProgress {
    let percentage = if goal.target > 0.0 {
        (goal.current / goal.target * 100.0).round().clamp(0.0, 100.0) as u32
    } else {
        0
    };

    let average_rate = (goal.current / days_in_period).max(0.0);
    // Negative once current passes target
    let projected_days_remaining = if average_rate > 0.0 {
        Some(((goal.target - goal.current) / average_rate).ceil() as i64)
    } else {
        None
    };

    let on_track = percentage >= config.on_track_percentage
        || projected_days_remaining.is_some_and(|d| d <= config.on_track_horizon_days);

    GoalProgress {
        goal_id: goal.id.clone(),
        title: goal.title.clone(),
        current: goal.current,
        target: goal.target,
        percentage,
        average_rate,
        projected_days_remaining,
        on_track,
    }
}

/// Mean of `min(1, current / target)` across goals; 0 when there are none.
pub fn mean_completion(goals: &[&Goal]) -> f64 {
    if goals.is_empty() {
        return 0.0;
    }
    let sum: f64 = goals
        .iter()
        .map(|g| {
            if g.target > 0.0 {
                (g.current / g.target).clamp(0.0, 1.0)
            } else {
                0.0
            }
        })
        .sum();
    sum / goals.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GoalKind, GoalStatus};
    use chrono::NaiveDate;

    fn ten_days() -> DateRange {
        DateRange::whole_days(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        )
        .unwrap()
    }

    fn goal(target: f64, current: f64) -> Goal {
        Goal {
            id: "g1".into(),
            title: "Ship it".into(),
            kind: GoalKind::Tasks,
            target,
            current,
            status: GoalStatus::Active,
            project_ids: vec![],
            category_ids: vec![],
            include_in_challenges: false,
        }
    }

    fn project_one(g: Goal) -> GoalProgress {
        project_goals(&[&g], &ten_days(), &ScoringConfig::default())
            .pop()
            .unwrap()
    }

    #[test]
    fn test_halfway_over_ten_days() {
        let p = project_one(goal(100.0, 50.0));
        assert_eq!(p.percentage, 50);
        assert_eq!(p.average_rate, 5.0);
        assert_eq!(p.projected_days_remaining, Some(10));
        assert!(p.on_track);
    }

    #[test]
    fn test_zero_target() {
        let p = project_one(goal(0.0, 0.0));
        assert_eq!(p.percentage, 0);
        assert_eq!(p.projected_days_remaining, None);
        assert!(!p.on_track);
    }

    #[test]
    fn test_zero_velocity_has_no_projection() {
        let p = project_one(goal(100.0, 0.0));
        assert_eq!(p.average_rate, 0.0);
        assert_eq!(p.projected_days_remaining, None);
        assert!(!p.on_track);
    }

    #[test]
    fn test_on_track_by_projection() {
        // 20% done at 2/day with 80 left → 40 days, not on track
        let p = project_one(goal(100.0, 20.0));
        assert_eq!(p.projected_days_remaining, Some(40));
        assert!(!p.on_track);

        // 40% done at 4/day with 60 left → 15 days, on track
        let p = project_one(goal(100.0, 40.0));
        assert_eq!(p.percentage, 40);
        assert_eq!(p.projected_days_remaining, Some(15));
        assert!(p.on_track);
    }

    #[test]
    fn test_overachieved_goal_projects_negative_days() {
        // 2.5/day with 15 past target
        let p = project_one(goal(10.0, 25.0));
        assert_eq!(p.percentage, 100);
        assert_eq!(p.average_rate, 2.5);
        assert_eq!(p.projected_days_remaining, Some(-6));
        assert!(p.on_track);

        let p = project_one(goal(10.0, 10.0));
        assert_eq!(p.projected_days_remaining, Some(0));
    }

    #[test]
    fn test_inactive_goals_skipped() {
        let mut g = goal(100.0, 50.0);
        g.status = GoalStatus::Paused;
        assert!(project_goals(&[&g], &ten_days(), &ScoringConfig::default()).is_empty());
    }

    #[test]
    fn test_mean_completion() {
        let a = goal(10.0, 5.0);
        let b = goal(10.0, 30.0);
        let c = goal(0.0, 3.0);
        assert_eq!(mean_completion(&[]), 0.0);
        assert!((mean_completion(&[&a, &b, &c]) - 0.5).abs() < 1e-9);
    }
}
