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

/// Lists document categories.
#[axum::debug_handler]
pub async fn list_categories(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Relayed> {
    state
        .backend
        .get("/api/categories", None, Some(&session.token))
        .await
}

/// Creates a category. The backend owns the payload shape, so the body is
/// forwarded verbatim.
#[axum::debug_handler]
pub async fn create_category(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    body: Bytes,
) -> Result<Relayed> {
    state
        .backend
        .send_raw_json(
            reqwest::Method::POST,
            "/api/categories",
            Some(&session.token),
            body.to_vec(),
        )
        .await
}

/// Deletes a category.
#[axum::debug_handler]
pub async fn delete_category(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(category_id): Path<i64>,
) -> Result<Relayed> {
    tracing::info!("🗑️ Deleting category {}", category_id);

    state
        .backend
        .delete(
            &format!("/api/categories/{}", category_id),
            Some(&session.token),
        )
        .await
}
