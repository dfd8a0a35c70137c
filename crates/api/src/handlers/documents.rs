//! Handlers for document/category associations.
//!
//! The document service files documents under categories through these
//! endpoints; documents themselves are stored elsewhere and referenced by id.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use docshelf_core::types::DbId;
use docshelf_db::models::document_category::SetDocumentCategories;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/documents/{id}/categories
pub async fn get_document_categories(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(document_id) = path?;
    let rows = state.categories().document_categories(document_id).await?;

    Ok(Json(DataResponse { data: rows }))
}

/// PUT /api/v1/documents/{id}/categories
///
/// Replace the full set of categories on a document.
pub async fn set_document_categories(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
    payload: Result<Json<SetDocumentCategories>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(document_id) = path?;
    let Json(input) = payload?;
    let rows = state
        .categories()
        .set_document_categories(document_id, input)
        .await?;

    tracing::info!(document_id, count = rows.len(), "Document categories replaced");

    Ok(Json(DataResponse { data: rows }))
}
