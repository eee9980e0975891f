pub mod cache;
pub mod remote;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{cache_dir, StoreConfig};
use crate::task::TaskList;

pub use cache::LocalCache;
pub use remote::RemoteStore;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StoreError {
    /// The authoritative read failed; callers fall back to the cache.
    #[error("remote read failed: {0}")]
    Read(String),

    /// The authoritative write failed; the local cache stays
    /// authoritative until retried.
    #[error("remote write failed: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// TaskStore trait
// ---------------------------------------------------------------------------

/// Per-day document store. `load` returns `None` for an absent document
/// (an empty collection); `save` replaces the whole day document.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn load(&self, day: &str) -> Result<Option<TaskList>, StoreError>;
    async fn save(&self, day: &str, tasks: &TaskList) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// DayStore
// ---------------------------------------------------------------------------

/// Remote store plus local mirror. Reads prefer the remote and fall back
/// to the cache; every successful read or write refreshes the cache, so
/// the cache always holds the last collection this device has seen.
pub struct DayStore {
    remote: Option<Box<dyn TaskStore>>,
    cache: LocalCache,
}

impl DayStore {
    pub fn from_config(cfg: &StoreConfig) -> Self {
        let remote: Option<Box<dyn TaskStore>> = if cfg.remote_url.is_empty() {
            None
        } else {
            Some(Box::new(RemoteStore::new(
                &cfg.remote_url,
                &cfg.user_id,
                &cfg.auth_token,
            )))
        };
        Self {
            remote,
            cache: LocalCache::new(cache_dir()),
        }
    }

    pub fn with_parts(remote: Option<Box<dyn TaskStore>>, cache: LocalCache) -> Self {
        Self { remote, cache }
    }

    /// Load a day's collection. Never fails: a remote read failure falls
    /// back to the cache, an absent document is an empty collection.
    pub async fn load_day(&self, day: &str) -> TaskList {
        if let Some(remote) = &self.remote {
            match remote.load(day).await {
                Ok(Some(tasks)) => {
                    if let Err(e) = self.cache.save_sync(day, &tasks) {
                        warn!(day, error = %e, "Failed to mirror day document into cache");
                    }
                    return tasks;
                }
                Ok(None) => return TaskList::default(),
                Err(e) => {
                    warn!(day, error = %e, "Remote read failed, falling back to cache");
                }
            }
        }
        match self.cache.load_sync(day) {
            Ok(Some(tasks)) => tasks,
            Ok(None) => TaskList::default(),
            Err(e) => {
                warn!(day, error = %e, "Cache read failed, starting empty");
                TaskList::default()
            }
        }
    }

    /// Persist a day's collection: cache first (authoritative locally),
    /// then the remote. A failed remote write is returned for the caller
    /// to surface; the cache write has already happened.
    pub async fn save_day(&self, day: &str, tasks: &TaskList) -> Result<(), StoreError> {
        self.cache.save_sync(day, tasks)?;
        if let Some(remote) = &self.remote {
            remote.save(day, tasks).await?;
            info!(day, count = tasks.tasks.len(), "Day document synced");
        }
        Ok(())
    }

    /// Past day documents known to this device, newest first.
    pub fn history(&self) -> Result<Vec<(String, TaskList)>, StoreError> {
        self.cache.list_days()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
