//! Device-local mirror of day documents, one JSON file per day.

use async_trait::async_trait;
use std::path::PathBuf;

use super::{StoreError, TaskStore};
use crate::task::TaskList;

/// File-per-day cache, `checklist-<YYYY-MM-DD>.json`, holding the last
/// collection this device has seen for each day.
pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn day_path(&self, day: &str) -> PathBuf {
        self.dir.join(format!("checklist-{day}.json"))
    }

    pub fn load_sync(&self, day: &str) -> Result<Option<TaskList>, StoreError> {
        let path = self.day_path(day);
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    pub fn save_sync(&self, day: &str, tasks: &TaskList) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(tasks)?;
        std::fs::write(self.day_path(day), json)?;
        Ok(())
    }

    /// All cached day documents, newest day first. Unparseable files are
    /// skipped rather than failing the whole listing.
    pub fn list_days(&self) -> Result<Vec<(String, TaskList)>, StoreError> {
        let mut out = Vec::new();
        if !self.dir.exists() {
            return Ok(out);
        }
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            let Some(day) = name
                .strip_prefix("checklist-")
                .and_then(|n| n.strip_suffix(".json"))
            else {
                continue;
            };
            match self.load_sync(day) {
                Ok(Some(tasks)) => out.push((day.to_string(), tasks)),
                Ok(None) => {}
                Err(_) => continue,
            }
        }
        out.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(out)
    }
}

#[async_trait]
impl TaskStore for LocalCache {
    async fn load(&self, day: &str) -> Result<Option<TaskList>, StoreError> {
        self.load_sync(day)
    }

    async fn save(&self, day: &str, tasks: &TaskList) -> Result<(), StoreError> {
        self.save_sync(day, tasks)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
