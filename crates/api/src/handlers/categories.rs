//! Handlers for the category hierarchy.
//!
//! Provides CRUD, the nested tree view, aggregate statistics, the integrity
//! report and per-category document listings.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use docshelf_core::types::DbId;
use docshelf_db::models::category::{CategoryDocumentsParams, CreateCategory, UpdateCategory};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/categories
///
/// List all categories with document counts, parents before children.
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = state.categories().list_categories().await?;

    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/categories
pub async fn create_category(
    State(state): State<AppState>,
    payload: Result<Json<CreateCategory>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let category = state.categories().create_category(input).await?;

    tracing::info!(
        category_id = category.id,
        parent_id = ?category.parent_id,
        depth = category.depth,
        "Category created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// GET /api/v1/categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(category_id) = path?;
    let category = state.categories().get_category(category_id).await?;

    Ok(Json(DataResponse { data: category }))
}

/// PUT /api/v1/categories/{id}
///
/// Partial update. `parent_id: null` moves the category to the root.
pub async fn update_category(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
    payload: Result<Json<UpdateCategory>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(category_id) = path?;
    let Json(input) = payload?;
    let category = state
        .categories()
        .update_category(category_id, input)
        .await?;

    tracing::info!(
        category_id,
        parent_id = ?category.parent_id,
        depth = category.depth,
        "Category updated",
    );

    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/categories/{id}
///
/// Rejected with 409 while the category still has children.
pub async fn delete_category(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(category_id) = path?;
    state.categories().delete_category(category_id).await?;

    tracing::info!(category_id, "Category deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// GET /api/v1/categories/stats
pub async fn category_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let stats = state.categories().category_stats().await?;

    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/categories/tree
pub async fn category_tree(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let tree = state.categories().category_tree().await?;

    Ok(Json(DataResponse { data: tree }))
}

/// GET /api/v1/categories/integrity
///
/// Lists cycles, dangling parents and stale paths. Empty when healthy.
pub async fn integrity_report(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let issues = state.categories().integrity_report().await?;

    Ok(Json(DataResponse { data: issues }))
}

/// GET /api/v1/categories/{id}/documents
///
/// Ids of documents filed under the category; `?include_descendants=true`
/// widens the scope to the whole subtree.
pub async fn category_documents(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
    query: Result<Query<CategoryDocumentsParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(category_id) = path?;
    let Query(params) = query?;
    let document_ids = state
        .categories()
        .documents_in_category(category_id, params.include_descendants.unwrap_or(false))
        .await?;

    Ok(Json(DataResponse { data: document_ids }))
}
