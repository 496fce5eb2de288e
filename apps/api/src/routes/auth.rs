//! Registration, login, and the onboarding email-availability check.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_token, hash_password, verify_password};
use crate::errors::AppError;
use crate::models::user::{Preferences, UserRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub timezone: Option<String>,
    /// Full onboarding payload: work/sleep/commute metrics and hobbies.
    pub preferences: Option<Preferences>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub uid: Uuid,
    pub role: String,
}

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("Email is not valid".to_string()));
    }

    let existing: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Validation("User already exists".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let preferences =
        serde_json::to_value(req.preferences.unwrap_or_default()).unwrap_or(json!({}));

    let user: UserRow = sqlx::query_as(
        r#"
        INSERT INTO users (email, password_hash, timezone, preferences)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(&email)
    .bind(&password_hash)
    .bind(req.timezone.unwrap_or_else(|| "Europe/Brussels".to_string()))
    .bind(&preferences)
    .fetch_one(&state.db)
    .await?;

    let token = generate_token(user.id, &user.role, &state.jwt)?;
    tracing::info!("Registered user {}", user.id);
    Ok(Json(AuthResponse {
        token,
        uid: user.id,
        role: user.role,
    }))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = req.email.trim().to_lowercase();
    let user: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?;

    // Same rejection for unknown email and wrong password.
    let user = user.ok_or(AppError::Unauthorized)?;
    if !verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    let token = generate_token(user.id, &user.role, &state.jwt)?;
    Ok(Json(AuthResponse {
        token,
        uid: user.id,
        role: user.role,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ExistsQuery {
    pub email: String,
}

/// GET /api/auth/exists?email=...
/// Used by the onboarding wizard before moving past step 1.
pub async fn handle_email_exists(
    State(state): State<AppState>,
    Query(params): Query<ExistsQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let email = params.email.trim().to_lowercase();
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?;
    Ok(Json(json!({ "exists": existing.is_some() })))
}
