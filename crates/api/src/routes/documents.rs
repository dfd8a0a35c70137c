//! Route definitions for document/category associations.

use axum::routing::get;
use axum::Router;

use crate::handlers::documents;
use crate::state::AppState;

/// Document association routes mounted at `/documents`.
///
/// ```text
/// GET    /{id}/categories    -> get_document_categories
/// PUT    /{id}/categories    -> set_document_categories
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}/categories",
        get(documents::get_document_categories).put(documents::set_document_categories),
    )
}
