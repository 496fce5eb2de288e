//! HTTP implementation of [`ScheduleBackend`] against the planner REST API.
//!
//! One typed client, bearer-authenticated, short timeout: callers treat
//! every method as best-effort and never block the interaction path on it.

#![allow(dead_code)]

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::schedule::{CustomTask, PlacementMap};
use crate::sync::{NewCustomTask, ProfileData, ScheduleBackend, SyncError};

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize, Deserialize)]
struct ScheduleBody {
    placements: PlacementMap,
}

#[derive(Debug, Serialize)]
struct TaskBody<'a> {
    task: &'a NewCustomTask,
}

#[derive(Debug, Deserialize)]
struct TaskListBody {
    tasks: Vec<CustomTask>,
}

#[derive(Clone)]
pub struct HttpScheduleClient {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpScheduleClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    async fn check(response: Response) -> Result<Response, SyncError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(SyncError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            })
        }
    }
}

#[async_trait]
impl ScheduleBackend for HttpScheduleClient {
    async fn load_profile(&self) -> Result<ProfileData, SyncError> {
        let response = self
            .client
            .get(self.url("/api/profile"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn save_placements(&self, placements: &PlacementMap) -> Result<PlacementMap, SyncError> {
        let response = self
            .client
            .post(self.url("/api/schedule"))
            .bearer_auth(&self.token)
            .json(&json!({ "placements": placements }))
            .send()
            .await?;
        let body: ScheduleBody = Self::check(response).await?.json().await?;
        Ok(body.placements)
    }

    async fn create_task(&self, task: &NewCustomTask) -> Result<Vec<CustomTask>, SyncError> {
        let response = self
            .client
            .post(self.url("/api/task"))
            .bearer_auth(&self.token)
            .json(&TaskBody { task })
            .send()
            .await?;
        let body: TaskListBody = Self::check(response).await?.json().await?;
        Ok(body.tasks)
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), SyncError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/task/{id}")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn log_event(&self, event_type: &str, payload: Value) -> Result<(), SyncError> {
        let response = self
            .client
            .post(self.url("/api/log/event"))
            .bearer_auth(&self.token)
            .json(&json!({
                "event_type": event_type,
                "payload": payload,
                "meta": { "client": "planner-engine" }
            }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
