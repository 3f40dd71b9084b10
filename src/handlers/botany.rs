use axum::extract::{RawQuery, State};

use crate::{
    error::Result,
    services::backend::Relayed,
    state::AppState,
};

// The catalog API sits behind the same session gate as everything else but
// does not consume a bearer token, so none is attached.

/// Lists plant species from the catalog API.
#[axum::debug_handler]
pub async fn list_species(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Relayed> {
    state.catalog.get("/species", query.as_deref(), None).await
}

/// Lists plant diseases from the catalog API.
#[axum::debug_handler]
pub async fn list_diseases(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Relayed> {
    state.catalog.get("/diseases", query.as_deref(), None).await
}
