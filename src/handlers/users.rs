use axum::{
    extract::{Path, RawQuery, State},
    Extension, Json,
};

use crate::{
    error::Result,
    models::session::Session,
    services::backend::Relayed,
    state::AppState,
};

/// Lists users, passing the caller's query string (pagination, search)
/// through to the backend untouched.
#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    RawQuery(query): RawQuery,
) -> Result<Relayed> {
    state
        .backend
        .get("/api/users", query.as_deref(), Some(&session.token))
        .await
}

/// Replaces a user's department assignments with the given id set.
#[axum::debug_handler]
pub async fn assign_departments(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(user_id): Path<i64>,
    Json(department_ids): Json<Vec<i64>>,
) -> Result<Relayed> {
    tracing::info!(
        "📋 Assigning {} departments to user {}",
        department_ids.len(),
        user_id
    );

    state
        .backend
        .send_json(
            reqwest::Method::PUT,
            &format!("/api/users/{}/assign-departments", user_id),
            Some(&session.token),
            &department_ids,
        )
        .await
}

/// Deletes a user.
#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(user_id): Path<i64>,
) -> Result<Relayed> {
    tracing::info!("🗑️ Deleting user {}", user_id);

    state
        .backend
        .delete(&format!("/api/users/{}", user_id), Some(&session.token))
        .await
}
