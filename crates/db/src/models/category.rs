//! Category models and DTOs.

use docshelf_core::category::{
    normalize_name, normalize_optional_text, validate_hex_color, validate_not_blank,
    CategoryNode,
};
use docshelf_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
    /// Ancestor ids from root to immediate parent.
    pub path: Vec<DbId>,
    pub depth: i32,
    pub icon: String,
    pub color: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CategoryNode for Category {
    fn id(&self) -> DbId {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn parent_id(&self) -> Option<DbId> {
        self.parent_id
    }
    fn path(&self) -> &[DbId] {
        &self.path
    }
    fn depth(&self) -> i32 {
        self.depth
    }
}

/// A category with its derived document count, as returned by list/get.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryWithCount {
    #[serde(flatten)]
    pub category: Category,
    pub document_count: i64,
}

impl CategoryNode for CategoryWithCount {
    fn id(&self) -> DbId {
        self.category.id
    }
    fn name(&self) -> &str {
        &self.category.name
    }
    fn parent_id(&self) -> Option<DbId> {
        self.category.parent_id
    }
    fn path(&self) -> &[DbId] {
        &self.category.path
    }
    fn depth(&self) -> i32 {
        self.category.depth
    }
}

/// Fully resolved values for inserting or rewriting a category row.
///
/// `path`/`depth` are written separately through path updates so that a
/// reparent and its cascade share one code path.
#[derive(Debug, Clone)]
pub struct CategoryRecord {
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
    pub icon: String,
    pub color: String,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating a category. Omitted `icon`/`color` are derived from the name.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategory {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 100, message = "Name must be at most 100 characters")
    )]
    pub name: String,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
    #[validate(length(max = 50, message = "Icon must be at most 50 characters"))]
    pub icon: Option<String>,
    #[validate(custom(function = "validate_hex_color"))]
    pub color: Option<String>,
}

impl CreateCategory {
    /// Trim text fields; blank optional fields become `None`.
    pub fn normalized(self) -> Self {
        Self {
            name: normalize_name(&self.name),
            description: normalize_optional_text(self.description.as_deref()),
            parent_id: self.parent_id,
            icon: normalize_optional_text(self.icon.as_deref()),
            color: normalize_optional_text(self.color.as_deref()),
        }
    }
}

/// DTO for partially updating a category.
///
/// For the nullable fields a missing key leaves the value unchanged and an
/// explicit `null` clears it: `parent_id: null` moves the category to the
/// root, `icon: null` / `color: null` go back to the name-derived default.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCategory {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 100, message = "Name must be at most 100 characters")
    )]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::deserialize_present")]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::deserialize_present")]
    pub parent_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "super::deserialize_present")]
    #[validate(length(max = 50, message = "Icon must be at most 50 characters"))]
    pub icon: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::deserialize_present")]
    #[validate(custom(function = "validate_hex_color"))]
    pub color: Option<Option<String>>,
}

impl UpdateCategory {
    /// Trim text fields; a blank nullable value is treated like `null`.
    pub fn normalized(self) -> Self {
        let clean = |v: Option<Option<String>>| {
            v.map(|inner| normalize_optional_text(inner.as_deref()))
        };
        Self {
            name: self.name.as_deref().map(normalize_name),
            description: clean(self.description),
            parent_id: self.parent_id,
            icon: clean(self.icon),
            color: clean(self.color),
        }
    }
}

/// Query parameters for `GET /api/v1/categories/{id}/documents`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryDocumentsParams {
    /// Include documents filed anywhere below the category. Defaults to `false`.
    pub include_descendants: Option<bool>,
}
