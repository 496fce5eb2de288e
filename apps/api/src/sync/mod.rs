//! Sync Adapter — the seam between the in-memory engine and persistence.
//!
//! The engine holds an `Arc<dyn ScheduleBackend>` so the transport can be
//! swapped (the HTTP client in production, a recording mock in tests).
//! All persistence is best-effort: the in-memory map stays authoritative
//! for the session whether or not a save lands.

#![allow(dead_code)]

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::models::schedule::{CustomTask, PlacementMap};
use crate::models::user::Preferences;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Everything the engine needs at session start, in one fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileData {
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub custom_tasks: Vec<CustomTask>,
    #[serde(default)]
    pub placements: PlacementMap,
}

/// A custom task as submitted by the user, before the server assigns an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomTask {
    pub name: String,
    pub duration_hours: f64,
    #[serde(default)]
    pub location: String,
}

#[async_trait]
pub trait ScheduleBackend: Send + Sync {
    /// Single fetch at session start. An error here is the user-visible
    /// "could not load schedule" state.
    async fn load_profile(&self) -> Result<ProfileData, SyncError>;

    /// Full-map replace, last-write-wins. Returns the stored map.
    async fn save_placements(&self, placements: &PlacementMap) -> Result<PlacementMap, SyncError>;

    /// Appends a custom task; returns the updated task list.
    async fn create_task(&self, task: &NewCustomTask) -> Result<Vec<CustomTask>, SyncError>;

    async fn delete_task(&self, id: Uuid) -> Result<(), SyncError>;

    /// Interaction telemetry; strictly fire-and-forget from callers.
    async fn log_event(&self, event_type: &str, payload: Value) -> Result<(), SyncError>;
}
