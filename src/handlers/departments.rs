use axum::{
    body::Bytes,
    extract::{Path, State},
    Extension,
};

use crate::{
    error::Result,
    models::session::Session,
    services::backend::Relayed,
    state::AppState,
};

/// Lists departments.
#[axum::debug_handler]
pub async fn list_departments(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Relayed> {
    state
        .backend
        .get("/api/departments", None, Some(&session.token))
        .await
}

/// Creates a department, forwarding the body verbatim.
#[axum::debug_handler]
pub async fn create_department(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    body: Bytes,
) -> Result<Relayed> {
    state
        .backend
        .send_raw_json(
            reqwest::Method::POST,
            "/api/departments",
            Some(&session.token),
            body.to_vec(),
        )
        .await
}

/// Deletes a department.
#[axum::debug_handler]
pub async fn delete_department(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(department_id): Path<i64>,
) -> Result<Relayed> {
    tracing::info!("🗑️ Deleting department {}", department_id);

    state
        .backend
        .delete(
            &format!("/api/departments/{}", department_id),
            Some(&session.token),
        )
        .await
}
