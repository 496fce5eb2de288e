use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::schedule::PlacementMap;
use crate::scheduler::grid;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveScheduleRequest {
    pub placements: PlacementMap,
}

#[derive(Debug, Serialize)]
pub struct SaveScheduleResponse {
    pub placements: PlacementMap,
}

/// POST /api/schedule
/// Replaces the stored placement map wholesale (last-write-wins; each
/// client call carries the full map) and returns the stored copy.
pub async fn handle_save_schedule(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<SaveScheduleRequest>,
) -> Result<Json<SaveScheduleResponse>, AppError> {
    // Slot ids already parsed by serde; reject anchors outside the grid.
    // Minimum duration is half an hour, so anything anchored on the last
    // visible row or later cannot fit.
    for (activity_id, slot) in &req.placements {
        if !grid::fits_in_day(slot.hour, 0.5) {
            return Err(AppError::Validation(format!(
                "Placement of '{activity_id}' at {slot} is outside the grid"
            )));
        }
    }

    let body = serde_json::to_value(&req.placements)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("placement map not serializable: {e}")))?;

    let (stored,): (serde_json::Value,) = sqlx::query_as(
        r#"
        INSERT INTO schedules (user_id, placements, updated_at)
        VALUES ($1, $2, now())
        ON CONFLICT (user_id)
        DO UPDATE SET placements = EXCLUDED.placements, updated_at = now()
        RETURNING placements
        "#,
    )
    .bind(user.id)
    .bind(&body)
    .fetch_one(&state.db)
    .await?;

    let placements: PlacementMap = serde_json::from_value(stored).unwrap_or_default();
    Ok(Json(SaveScheduleResponse { placements }))
}
