use std::path::{Path, PathBuf};

use crate::config::app_dir;
use crate::error::{Error, Result};
use crate::model::EntitySet;

/// Entities exported from the data store to a JSON file.
///
/// The report core never touches the filesystem; this is how the CLI
/// gets an [`EntitySet`] to hand it.
#[derive(Debug, Clone)]
pub struct Snapshot {
    path: Option<PathBuf>,
    entities: EntitySet,
}

impl Snapshot {
    /// Open the snapshot at the default path (`~/.focusreport/data.json`).
    pub fn open() -> Result<Self> {
        let dir = app_dir().ok_or_else(|| Error::Config("cannot determine home directory".into()))?;
        Self::open_at(dir.join("data.json"))
    }

    /// Open the snapshot at the given path.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let raw = std::fs::read_to_string(&path)?;
        let mut snapshot = Self::from_json(&raw)?;
        log::info!(
            "Loaded {} tasks, {} time entries, {} sessions, {} goals from {}",
            snapshot.entities.tasks.len(),
            snapshot.entities.time_entries.len(),
            snapshot.entities.sessions.len(),
            snapshot.entities.goals.len(),
            path.display()
        );
        snapshot.path = Some(path);
        Ok(snapshot)
    }

    /// Parse a snapshot held in memory (for testing and piping).
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(Self {
            path: None,
            entities: serde_json::from_str(raw)?,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn entities(&self) -> &EntitySet {
        &self.entities
    }
}
