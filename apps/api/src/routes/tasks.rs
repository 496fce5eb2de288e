//! Custom task CRUD. Creation sanitizes input server-side (trim the name,
//! floor the duration at half an hour); deletion also clears the task's
//! entry from the stored placement map so no dangling reference survives.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::schedule::{CustomTask, CustomTaskRow, PlacementMap};
use crate::scheduler::catalog::{sanitize_duration, sanitize_name};
use crate::state::AppState;
use crate::sync::NewCustomTask;

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub task: NewCustomTask,
}

#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<CustomTask>,
}

/// POST /api/task
pub async fn handle_create_task(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskListResponse>), AppError> {
    let name = sanitize_name(&req.task.name)
        .ok_or_else(|| AppError::Validation("Task name must not be empty".to_string()))?;
    let duration = sanitize_duration(req.task.duration_hours);

    sqlx::query(
        r#"
        INSERT INTO custom_tasks (user_id, name, duration_hours, location)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(user.id)
    .bind(&name)
    .bind(duration)
    .bind(req.task.location.trim())
    .execute(&state.db)
    .await?;

    let tasks = list_tasks(&state, user.id).await?;
    Ok((StatusCode::CREATED, Json(TaskListResponse { tasks })))
}

/// DELETE /api/task/:id
pub async fn handle_delete_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM custom_tasks WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user.id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Task {id} not found")));
    }

    clear_placement(&state, user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_tasks(state: &AppState, user_id: Uuid) -> Result<Vec<CustomTask>, AppError> {
    let rows: Vec<CustomTaskRow> =
        sqlx::query_as("SELECT * FROM custom_tasks WHERE user_id = $1 ORDER BY created_at")
            .bind(user_id)
            .fetch_all(&state.db)
            .await?;
    Ok(rows.into_iter().map(CustomTask::from).collect())
}

/// Removes the deleted task's entry from the stored placement map, if any.
async fn clear_placement(state: &AppState, user_id: Uuid, task_id: Uuid) -> Result<(), AppError> {
    let stored: Option<(serde_json::Value,)> =
        sqlx::query_as("SELECT placements FROM schedules WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&state.db)
            .await?;
    let Some((value,)) = stored else {
        return Ok(());
    };

    let mut placements: PlacementMap = serde_json::from_value(value).unwrap_or_default();
    if placements.remove(&task_id.to_string()).is_none() {
        return Ok(());
    }

    let body = serde_json::to_value(&placements)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("placement map not serializable: {e}")))?;
    sqlx::query("UPDATE schedules SET placements = $1, updated_at = now() WHERE user_id = $2")
        .bind(&body)
        .bind(user_id)
        .execute(&state.db)
        .await?;
    Ok(())
}
