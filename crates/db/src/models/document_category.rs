//! Document/category association models and DTOs.

use docshelf_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `document_categories` junction table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentCategory {
    pub id: DbId,
    pub document_id: DbId,
    pub category_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for replacing the full set of categories on a document.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetDocumentCategories {
    /// Target category ids. An empty list removes every association.
    #[validate(length(max = 50, message = "A document can be filed under at most 50 categories"))]
    pub category_ids: Vec<DbId>,
}
