pub mod auth;
pub mod health;
pub mod log;
pub mod profile;
pub mod schedule;
pub mod tasks;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth & onboarding
        .route("/api/auth/register", post(auth::handle_register))
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/auth/exists", get(auth::handle_email_exists))
        // Planner data
        .route("/api/profile", get(profile::handle_get_profile))
        .route("/api/schedule", post(schedule::handle_save_schedule))
        .route("/api/task", post(tasks::handle_create_task))
        .route("/api/task/:id", delete(tasks::handle_delete_task))
        // Telemetry
        .route("/api/log/event", post(log::handle_log_event))
        .route("/api/admin/events", get(log::handle_list_events))
        .with_state(state)
}
