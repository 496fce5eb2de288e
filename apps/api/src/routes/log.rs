//! Interaction telemetry: a best-effort event sink and the admin listing.
//! Payloads are stored as submitted; credential material is never accepted
//! or echoed here.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::event::EventRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LogEventRequest {
    pub event_type: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub meta: Value,
}

/// POST /api/log/event
pub async fn handle_log_event(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<LogEventRequest>,
) -> Result<StatusCode, AppError> {
    let event_type = req.event_type.trim().to_uppercase();
    if event_type.is_empty() {
        return Err(AppError::Validation("event_type is required".to_string()));
    }

    let payload = if req.payload.is_null() {
        json!({})
    } else {
        req.payload
    };
    let meta = if req.meta.is_null() { json!({}) } else { req.meta };

    sqlx::query(
        "INSERT INTO events (user_id, event_type, payload, meta) VALUES ($1, $2, $3, $4)",
    )
    .bind(user.id)
    .bind(&event_type)
    .bind(&payload)
    .bind(&meta)
    .execute(&state.db)
    .await?;

    Ok(StatusCode::CREATED)
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub uid: Option<Uuid>,
    pub limit: Option<i64>,
}

/// GET /api/admin/events
/// Admin-only listing of recorded events, newest first.
pub async fn handle_list_events(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<EventsQuery>,
) -> Result<Json<Vec<EventRow>>, AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden);
    }

    let limit = params.limit.unwrap_or(100).clamp(1, 1000);
    let events: Vec<EventRow> = match params.uid {
        Some(uid) => {
            sqlx::query_as(
                "SELECT * FROM events WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
            )
            .bind(uid)
            .bind(limit)
            .fetch_all(&state.db)
            .await?
        }
        None => {
            sqlx::query_as("SELECT * FROM events ORDER BY created_at DESC LIMIT $1")
                .bind(limit)
                .fetch_all(&state.db)
                .await?
        }
    };

    Ok(Json(events))
}
