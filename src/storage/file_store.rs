/// JSON file-backed data store
///
/// The fallback data layer: one document holding all four collections plus a
/// schema version, used for export/import and offline snapshots. Loads run
/// migrations; saves go through a sibling temp file and a rename so a crash
/// mid-write cannot truncate existing data.

use crate::db::{Note, Project, Reminder, Task};
use crate::error::Result;
use crate::state::AppState;
use crate::storage::migrations::{run_migrations, LATEST_VERSION};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The on-disk document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataFile {
    pub schema_version: u32,
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    pub notes: Vec<Note>,
    pub reminders: Vec<Reminder>,
}

impl DataFile {
    /// Wrap an in-memory snapshot at the current format version
    pub fn from_state(state: AppState) -> Self {
        Self {
            schema_version: LATEST_VERSION,
            projects: state.projects,
            tasks: state.tasks,
            notes: state.notes,
            reminders: state.reminders,
        }
    }

    /// Unwrap into an in-memory snapshot
    pub fn into_state(self) -> AppState {
        AppState {
            projects: self.projects,
            tasks: self.tasks,
            notes: self.notes,
            reminders: self.reminders,
        }
    }
}

/// Store reading and writing one DataFile path
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and migrate the data file
    ///
    /// A missing file is an empty store at the latest version, not an error.
    pub fn load(&self) -> Result<DataFile> {
        if !self.path.exists() {
            return Ok(DataFile {
                schema_version: LATEST_VERSION,
                ..Default::default()
            });
        }

        let raw = std::fs::read_to_string(&self.path)?;
        let mut data: DataFile = serde_json::from_str(&raw)?;

        let applied = run_migrations(&mut data)?;
        if !applied.is_empty() {
            // Persist the upgraded document so migrations run once
            self.save(&data)?;
        }

        Ok(data)
    }

    /// Write the data file
    pub fn save(&self, data: &DataFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(data)?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;

        Ok(())
    }
}
