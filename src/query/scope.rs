use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{EntitySet, Goal, PomodoroSession, Task, TimeEntry};
use crate::query::period::{DateRange, RangeSelector};

/// Dimension used to narrow entities before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    #[default]
    Global,
    Project,
    Category,
    Goals,
}

impl Scope {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "global" => Ok(Scope::Global),
            "project" => Ok(Scope::Project),
            "category" => Ok(Scope::Category),
            "goals" => Ok(Scope::Goals),
            other => Err(Error::Scope(format!("unrecognized scope: {other}"))),
        }
    }
}

/// The request parameters selecting which report to compute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportFilters {
    pub range: RangeSelector,
    #[serde(default)]
    pub custom_range: Option<DateRange>,
    #[serde(default)]
    pub compare_with_previous: bool,
    #[serde(default)]
    pub scope: Scope,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
}

/// Borrowed view of the entities that survive scope filtering.
#[derive(Debug, Clone, Default)]
pub struct ScopedEntities<'a> {
    pub tasks: Vec<&'a Task>,
    pub time_entries: Vec<&'a TimeEntry>,
    pub sessions: Vec<&'a PomodoroSession>,
    pub goals: Vec<&'a Goal>,
}

/// Narrow `entities` to the scope selected by `filters`.
///
/// Pomodoro sessions carry no project or category and always pass through.
pub fn apply_scope<'a>(filters: &ReportFilters, entities: &'a EntitySet) -> Result<ScopedEntities<'a>> {
    let sessions: Vec<&PomodoroSession> = entities.sessions.iter().collect();

    let scoped = match filters.scope {
        Scope::Global => ScopedEntities {
            tasks: entities.tasks.iter().collect(),
            time_entries: entities.time_entries.iter().collect(),
            sessions,
            goals: entities.goals.iter().collect(),
        },
        Scope::Project => {
            let id = required(&filters.project_id, "project")?;
            ScopedEntities {
                tasks: entities
                    .tasks
                    .iter()
                    .filter(|t| t.project_id.as_deref() == Some(id))
                    .collect(),
                time_entries: entities
                    .time_entries
                    .iter()
                    .filter(|e| e.project_ids.iter().any(|p| p == id))
                    .collect(),
                sessions,
                goals: entities
                    .goals
                    .iter()
                    .filter(|g| g.project_ids.iter().any(|p| p == id))
                    .collect(),
            }
        }
        Scope::Category => {
            let id = required(&filters.category_id, "category")?;
            ScopedEntities {
                tasks: entities
                    .tasks
                    .iter()
                    .filter(|t| t.category_ids.iter().any(|c| c == id))
                    .collect(),
                time_entries: entities
                    .time_entries
                    .iter()
                    .filter(|e| e.category_ids.iter().any(|c| c == id))
                    .collect(),
                sessions,
                goals: entities
                    .goals
                    .iter()
                    .filter(|g| g.category_ids.iter().any(|c| c == id))
                    .collect(),
            }
        }
        Scope::Goals => {
            let goals: Vec<&Goal> = entities
                .goals
                .iter()
                .filter(|g| g.include_in_challenges)
                .collect();
            let links = GoalLinks::new(&goals);
            ScopedEntities {
                tasks: entities
                    .tasks
                    .iter()
                    .filter(|t| links.covers(t.project_id.as_deref().into_iter(), &t.category_ids))
                    .collect(),
                time_entries: entities
                    .time_entries
                    .iter()
                    .filter(|e| links.covers(e.project_ids.iter().map(String::as_str), &e.category_ids))
                    .collect(),
                sessions,
                goals,
            }
        }
    };

    log::debug!(
        "Scope {:?}: {} tasks, {} time entries, {} sessions, {} goals",
        filters.scope,
        scoped.tasks.len(),
        scoped.time_entries.len(),
        scoped.sessions.len(),
        scoped.goals.len()
    );
    Ok(scoped)
}

/// Projects and categories referenced by challenge-eligible goals.
struct GoalLinks<'a> {
    projects: HashSet<&'a str>,
    categories: HashSet<&'a str>,
}

impl<'a> GoalLinks<'a> {
    fn new(goals: &[&'a Goal]) -> Self {
        Self {
            projects: goals
                .iter()
                .flat_map(|g| g.project_ids.iter().map(String::as_str))
                .collect(),
            categories: goals
                .iter()
                .flat_map(|g| g.category_ids.iter().map(String::as_str))
                .collect(),
        }
    }

    fn covers<'s>(&self, mut project_ids: impl Iterator<Item = &'s str>, category_ids: &[String]) -> bool {
        project_ids.any(|p| self.projects.contains(p))
            || category_ids.iter().any(|c| self.categories.contains(c.as_str()))
    }
}

fn required<'f>(id: &'f Option<String>, what: &str) -> Result<&'f str> {
    id.as_deref()
        .ok_or_else(|| Error::Scope(format!("{what} scope requires a {what} id")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GoalKind, GoalStatus, SessionType};
    use crate::timestamp::Timestamp;

    fn task(id: &str, project: Option<&str>, categories: &[&str]) -> Task {
        Task {
            id: id.into(),
            completed: true,
            completed_at: Some(Timestamp::Text("2025-01-06T10:00:00".into())),
            project_id: project.map(Into::into),
            category_ids: categories.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn entry(projects: &[&str], categories: &[&str]) -> TimeEntry {
        TimeEntry {
            start_time: Timestamp::Text("2025-01-06T10:00:00".into()),
            duration: 600,
            project_ids: projects.iter().map(|p| p.to_string()).collect(),
            category_ids: categories.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn goal(id: &str, projects: &[&str], categories: &[&str], challenge: bool) -> Goal {
        Goal {
            id: id.into(),
            title: id.into(),
            kind: GoalKind::Tasks,
            target: 10.0,
            current: 1.0,
            status: GoalStatus::Active,
            project_ids: projects.iter().map(|p| p.to_string()).collect(),
            category_ids: categories.iter().map(|c| c.to_string()).collect(),
            include_in_challenges: challenge,
        }
    }

    fn fixture() -> EntitySet {
        EntitySet {
            tasks: vec![
                task("t1", Some("p1"), &["c1"]),
                task("t2", Some("p2"), &["c2"]),
                task("t3", None, &["c1", "c2"]),
            ],
            time_entries: vec![entry(&["p1"], &[]), entry(&["p1", "p2"], &["c2"]), entry(&[], &[])],
            sessions: vec![PomodoroSession {
                session_type: SessionType::Pomodoro,
                completed_at: Timestamp::Text("2025-01-06T10:00:00".into()),
            }],
            goals: vec![
                goal("g1", &["p1"], &[], true),
                goal("g2", &[], &["c2"], false),
            ],
            ..Default::default()
        }
    }

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_global_passes_everything() {
        let set = fixture();
        let s = apply_scope(&ReportFilters::default(), &set).unwrap();
        assert_eq!(s.tasks.len(), 3);
        assert_eq!(s.time_entries.len(), 3);
        assert_eq!(s.sessions.len(), 1);
        assert_eq!(s.goals.len(), 2);
    }

    #[test]
    fn test_project_scope() {
        let set = fixture();
        let filters = ReportFilters {
            scope: Scope::Project,
            project_id: Some("p2".into()),
            ..Default::default()
        };
        let s = apply_scope(&filters, &set).unwrap();
        assert_eq!(ids(&s.tasks), vec!["t2"]);
        assert_eq!(s.time_entries.len(), 1);
        assert!(s.goals.is_empty());
        assert_eq!(s.sessions.len(), 1);
    }

    #[test]
    fn test_category_scope() {
        let set = fixture();
        let filters = ReportFilters {
            scope: Scope::Category,
            category_id: Some("c1".into()),
            ..Default::default()
        };
        let s = apply_scope(&filters, &set).unwrap();
        assert_eq!(ids(&s.tasks), vec!["t1", "t3"]);
        assert!(s.time_entries.is_empty());
        assert!(s.goals.is_empty());
    }

    #[test]
    fn test_goals_scope_follows_eligible_goal_links() {
        let set = fixture();
        let filters = ReportFilters {
            scope: Scope::Goals,
            ..Default::default()
        };
        let s = apply_scope(&filters, &set).unwrap();
        // Only g1 is in challenges; it links project p1
        assert_eq!(s.goals.len(), 1);
        assert_eq!(s.goals[0].id, "g1");
        assert_eq!(ids(&s.tasks), vec!["t1"]);
        assert_eq!(s.time_entries.len(), 2);
    }

    #[test]
    fn test_missing_id_is_error() {
        let set = fixture();
        let filters = ReportFilters {
            scope: Scope::Project,
            ..Default::default()
        };
        assert!(matches!(apply_scope(&filters, &set), Err(Error::Scope(_))));
    }

    #[test]
    fn test_parse_scope() {
        assert_eq!(Scope::parse("goals").unwrap(), Scope::Goals);
        assert_eq!(Scope::parse("PROJECT").unwrap(), Scope::Project);
        assert!(Scope::parse("team").is_err());
    }
}
