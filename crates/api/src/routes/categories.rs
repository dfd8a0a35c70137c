//! Route definitions for the category hierarchy.

use axum::routing::get;
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Category routes mounted at `/categories`.
///
/// ```text
/// GET    /                   -> list_categories
/// POST   /                   -> create_category
/// GET    /stats              -> category_stats
/// GET    /tree               -> category_tree
/// GET    /integrity          -> integrity_report
/// GET    /{id}               -> get_category
/// PUT    /{id}               -> update_category
/// DELETE /{id}               -> delete_category
/// GET    /{id}/documents     -> category_documents
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(categories::list_categories).post(categories::create_category),
        )
        .route("/stats", get(categories::category_stats))
        .route("/tree", get(categories::category_tree))
        .route("/integrity", get(categories::integrity_report))
        .route(
            "/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/{id}/documents", get(categories::category_documents))
}
