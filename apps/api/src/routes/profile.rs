use axum::extract::State;
use axum::Json;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::schedule::{CustomTask, CustomTaskRow, PlacementMap, ScheduleRow};
use crate::models::user::{Preferences, UserRow};
use crate::state::AppState;
use crate::sync::ProfileData;

/// GET /api/profile
/// The single session-start fetch: preferences, custom tasks, and the
/// stored placement map, shaped exactly as the engine's `ProfileData`.
pub async fn handle_get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ProfileData>, AppError> {
    let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user.id)
        .fetch_optional(&state.db)
        .await?;
    let row = row.ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let tasks: Vec<CustomTaskRow> =
        sqlx::query_as("SELECT * FROM custom_tasks WHERE user_id = $1 ORDER BY created_at")
            .bind(user.id)
            .fetch_all(&state.db)
            .await?;

    let schedule: Option<ScheduleRow> =
        sqlx::query_as("SELECT * FROM schedules WHERE user_id = $1")
            .bind(user.id)
            .fetch_optional(&state.db)
            .await?;
    // Stored maps may predate the current catalog; decode leniently and let
    // the engine's dangling-reference handling deal with stale ids.
    let placements: PlacementMap = schedule
        .map(|s| serde_json::from_value(s.placements).unwrap_or_default())
        .unwrap_or_default();

    Ok(Json(ProfileData {
        preferences: Preferences::from_value(row.preferences),
        custom_tasks: tasks.into_iter().map(CustomTask::from).collect(),
        placements,
    }))
}
