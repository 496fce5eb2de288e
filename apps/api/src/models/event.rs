use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One recorded interaction event (drag commits, session lifecycle, ...).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_type: String,
    pub payload: Value,
    pub meta: Value,
    pub created_at: DateTime<Utc>,
}
