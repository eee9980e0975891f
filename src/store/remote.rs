//! Remote per-day document store over HTTP.

use async_trait::async_trait;

use super::{StoreError, TaskStore};
use crate::task::TaskList;

/// Document path: `{base}/users/{user_id}/history/{day}`. A 404 on read
/// means the day has no document yet; writes replace the whole document.
pub struct RemoteStore {
    base_url: String,
    user_id: String,
    auth_token: String,
    client: reqwest::Client,
}

impl RemoteStore {
    pub fn new(base_url: &str, user_id: &str, auth_token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_id: user_id.to_string(),
            auth_token: auth_token.to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn day_url(&self, day: &str) -> String {
        format!("{}/users/{}/history/{}", self.base_url, self.user_id, day)
    }

    fn with_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.auth_token.is_empty() {
            req
        } else {
            req.bearer_auth(&self.auth_token)
        }
    }
}

#[async_trait]
impl TaskStore for RemoteStore {
    async fn load(&self, day: &str) -> Result<Option<TaskList>, StoreError> {
        let resp = self
            .with_auth(self.client.get(self.day_url(day)))
            .send()
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = resp
            .error_for_status()
            .map_err(|e| StoreError::Read(e.to_string()))?;
        let tasks = resp
            .json::<TaskList>()
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;
        Ok(Some(tasks))
    }

    async fn save(&self, day: &str, tasks: &TaskList) -> Result<(), StoreError> {
        let resp = self
            .with_auth(self.client.put(self.day_url(day)))
            .json(tasks)
            .send()
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;
        resp.error_for_status()
            .map_err(|e| StoreError::Write(e.to_string()))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
