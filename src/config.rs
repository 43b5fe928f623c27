use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Weights and thresholds used by the metric calculators.
///
/// Defaults are the product's standard scoring; a config file only needs
/// to list the fields it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Intensity contributed by each completed task.
    pub task_weight: f64,
    /// Intensity contributed by each completed pomodoro.
    pub pomodoro_weight: f64,
    /// Intensity contributed by each tracked hour.
    pub hour_weight: f64,
    /// Streak length that earns the full streak sub-score.
    pub streak_target_days: u32,
    /// A goal at or above this percentage is on track.
    pub on_track_percentage: u32,
    /// A goal projected to finish within this many days is on track.
    pub on_track_horizon_days: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            task_weight: 1.0,
            pomodoro_weight: 0.8,
            hour_weight: 0.5,
            streak_target_days: 14,
            on_track_percentage: 50,
            on_track_horizon_days: 30,
        }
    }
}

impl ScoringConfig {
    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: ScoringConfig = serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        log::debug!("Loaded scoring config from {}", path.display());
        Ok(config)
    }

    /// Load `~/.focusreport/config.json` if it exists, defaults otherwise.
    pub fn load_default() -> Result<Self> {
        match default_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.streak_target_days == 0 {
            return Err(Error::Config("streak_target_days must be at least 1".into()));
        }
        for (name, w) in [
            ("task_weight", self.task_weight),
            ("pomodoro_weight", self.pomodoro_weight),
            ("hour_weight", self.hour_weight),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(Error::Config(format!("{name} must be a non-negative number")));
            }
        }
        Ok(())
    }
}

/// Directory holding the config and data files (`~/.focusreport`).
pub fn app_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".focusreport"))
}

fn default_path() -> Option<PathBuf> {
    app_dir().map(|d| d.join("config.json"))
}
