use axum::{
    extract::{Multipart, Path, RawQuery, State},
    Extension,
};

use crate::{
    error::{AppError, Result},
    models::session::Session,
    services::backend::Relayed,
    state::AppState,
};

/// Lists documents with query passthrough.
#[axum::debug_handler]
pub async fn list_documents(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    RawQuery(query): RawQuery,
) -> Result<Relayed> {
    state
        .backend
        .get("/api/documents", query.as_deref(), Some(&session.token))
        .await
}

/// Uploads a document.
///
/// The inbound multipart form (`file, title, categoryId, departmentId`) is
/// rebuilt field-for-field into the outbound request. The outbound content
/// type is left to the HTTP client, which owns the multipart boundary.
#[axum::debug_handler]
pub async fn upload_document(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    mut multipart: Multipart,
) -> Result<Relayed> {
    let mut form = reqwest::multipart::Form::new();
    let mut field_count = 0usize;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Multipart(format!("Parse error: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name.is_empty() {
            continue;
        }
        field_count += 1;

        if name == "file" {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Multipart(format!("file field: {}", e)))?;

            tracing::debug!("📄 Upload file field: {} bytes", data.len());

            let mut part = reqwest::multipart::Part::bytes(data.to_vec());
            if let Some(file_name) = file_name {
                part = part.file_name(file_name);
            }
            if let Some(content_type) = content_type {
                part = part
                    .mime_str(&content_type)
                    .map_err(|e| AppError::Multipart(format!("file content type: {}", e)))?;
            }
            form = form.part("file", part);
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Multipart(format!("{} field: {}", name, e)))?;
            form = form.text(name, value);
        }
    }

    if field_count == 0 {
        return Err(AppError::Multipart("Empty upload form".to_string()));
    }

    tracing::info!("📤 Forwarding document upload ({} fields)", field_count);

    state
        .backend
        .post_multipart("/api/documents", Some(&session.token), form)
        .await
}

/// Deletes a document.
#[axum::debug_handler]
pub async fn delete_document(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(document_id): Path<i64>,
) -> Result<Relayed> {
    tracing::info!("🗑️ Deleting document {}", document_id);

    state
        .backend
        .delete(
            &format!("/api/documents/{}", document_id),
            Some(&session.token),
        )
        .await
}
