pub mod categories;
pub mod documents;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /categories                          list, create
/// /categories/stats                    aggregate counts
/// /categories/tree                     nested forest
/// /categories/integrity                stored-state audit
/// /categories/{id}                     get, update, delete
/// /categories/{id}/documents           documents filed under a category
///
/// /documents/{id}/categories           get, replace a document's categories
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/categories", categories::router())
        .nest("/documents", documents::router())
}
