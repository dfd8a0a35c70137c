//! The category service: the single entry point for category mutations and
//! derived views.
//!
//! Every mutation runs in one transaction that first takes the hierarchy
//! lock, then loads the current collection, validates against it, and writes.
//! Validation and write are therefore atomic with respect to other mutations,
//! and a failure at any step rolls the whole change back.

use std::collections::BTreeSet;

use docshelf_core::category::{is_name_taken, sort_for_display};
use docshelf_core::error::CoreError;
use docshelf_core::hierarchy::{
    build_tree, child_ids, find_integrity_issues, path_under, plan_reparent, IntegrityIssue, TreeBranch,
    CATEGORY_ENTITY,
};
use docshelf_core::stats::{
    compute_stats, documents_in_category, CategoryStatsSummary, DocumentCategoryIndex,
};
use docshelf_core::style::StyleAssigner;
use docshelf_core::types::DbId;
use docshelf_db::models::category::{
    Category, CategoryRecord, CategoryWithCount, CreateCategory, UpdateCategory,
};
use docshelf_db::models::document_category::{DocumentCategory, SetDocumentCategories};
use docshelf_db::repositories::{CategoryRepo, DocumentCategoryRepo};
use docshelf_db::DbPool;
use validator::Validate;

use crate::error::AppResult;

/// Category operations bound to a connection pool.
pub struct CategoryService<'a> {
    pool: &'a DbPool,
    styles: StyleAssigner,
}

impl<'a> CategoryService<'a> {
    pub fn new(pool: &'a DbPool, styles: StyleAssigner) -> Self {
        Self { pool, styles }
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Create a category. Missing `icon`/`color` are derived from the name.
    pub async fn create_category(&self, input: CreateCategory) -> AppResult<Category> {
        let input = input.normalized();
        input.validate().map_err(CoreError::from)?;

        let mut tx = self.pool.begin().await?;
        CategoryRepo::lock_hierarchy(&mut tx).await?;
        let snapshot = CategoryRepo::list_all(&mut *tx).await?;

        if is_name_taken(&snapshot, &input.name, None) {
            return Err(duplicate_name(&input.name).into());
        }

        let path = path_under(&snapshot, input.parent_id)?;
        let style = self.styles.resolve(
            &input.name,
            input.icon.as_deref(),
            input.color.as_deref(),
        );
        let record = CategoryRecord {
            name: input.name,
            description: input.description,
            parent_id: input.parent_id,
            icon: style.icon,
            color: style.color,
        };

        let category = CategoryRepo::insert(&mut tx, &record, &path).await?;
        tx.commit().await?;

        Ok(category)
    }

    /// Apply a partial update. Changing `parent_id` re-validates the move and
    /// recomputes the path of the category and all of its descendants.
    pub async fn update_category(&self, id: DbId, patch: UpdateCategory) -> AppResult<Category> {
        let patch = patch.normalized();
        patch.validate().map_err(CoreError::from)?;

        let mut tx = self.pool.begin().await?;
        CategoryRepo::lock_hierarchy(&mut tx).await?;
        let snapshot = CategoryRepo::list_all(&mut *tx).await?;

        let current = snapshot
            .iter()
            .find(|c| c.id == id)
            .ok_or(CoreError::NotFound {
                entity: CATEGORY_ENTITY,
                id,
            })?;

        let name = patch.name.unwrap_or_else(|| current.name.clone());
        if is_name_taken(&snapshot, &name, Some(id)) {
            return Err(duplicate_name(&name).into());
        }

        let parent_id = patch.parent_id.unwrap_or(current.parent_id);
        let plan = plan_reparent(&snapshot, id, parent_id).inspect_err(|err| {
            if let CoreError::Conflict(reason) = err {
                tracing::warn!(category_id = id, ?parent_id, %reason, "Category move rejected");
            }
        })?;

        let record = CategoryRecord {
            description: patch
                .description
                .unwrap_or_else(|| current.description.clone()),
            icon: match patch.icon {
                Some(Some(icon)) => icon,
                Some(None) => self.styles.icon_for(&name).to_string(),
                None => current.icon.clone(),
            },
            color: match patch.color {
                Some(Some(color)) => color,
                Some(None) => self.styles.color_for(&name).to_string(),
                None => current.color.clone(),
            },
            parent_id,
            name,
        };

        CategoryRepo::update_record(&mut tx, id, &record)
            .await?
            .ok_or(CoreError::NotFound {
                entity: CATEGORY_ENTITY,
                id,
            })?;

        if !plan.is_empty() {
            CategoryRepo::apply_path_updates(&mut tx, &plan).await?;
            tracing::debug!(
                category_id = id,
                descendants = plan.len() - 1,
                "Category paths recomputed"
            );
        }

        let updated = CategoryRepo::find_by_id(&mut *tx, id)
            .await?
            .ok_or(CoreError::Internal(format!(
                "Category {id} disappeared during update"
            )))?;
        tx.commit().await?;

        Ok(updated)
    }

    /// Delete a category.
    ///
    /// A category that still has children is never deleted; the caller must
    /// move or delete the children first. Document associations of the
    /// deleted category are dropped; the documents themselves are untouched.
    pub async fn delete_category(&self, id: DbId) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        CategoryRepo::lock_hierarchy(&mut tx).await?;

        let snapshot = CategoryRepo::list_all(&mut *tx).await?;
        let category = snapshot
            .iter()
            .find(|c| c.id == id)
            .ok_or(CoreError::NotFound {
                entity: CATEGORY_ENTITY,
                id,
            })?;

        let children = child_ids(&snapshot, id);
        if !children.is_empty() {
            tracing::warn!(category_id = id, ?children, "Category delete rejected");
            return Err(CoreError::Conflict(format!(
                "Category '{}' still has {} child categories; move or delete them first",
                category.name,
                children.len()
            ))
            .into());
        }

        CategoryRepo::delete(&mut tx, id).await?;
        tx.commit().await?;

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// A single category with its document count.
    pub async fn get_category(&self, id: DbId) -> AppResult<CategoryWithCount> {
        let category = CategoryRepo::find_by_id(self.pool, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: CATEGORY_ENTITY,
                id,
            })?;
        let index = DocumentCategoryRepo::load_index(self.pool).await?;

        let stats = compute_stats(std::slice::from_ref(&category), &index);
        Ok(CategoryWithCount {
            document_count: stats.count_for(id),
            category,
        })
    }

    /// All categories with document counts, in display order.
    pub async fn list_categories(&self) -> AppResult<Vec<CategoryWithCount>> {
        let (categories, index) = self.load_snapshot().await?;
        Ok(with_counts(categories, &index))
    }

    /// Totals and the average number of documents per category.
    pub async fn category_stats(&self) -> AppResult<CategoryStatsSummary> {
        let (categories, index) = self.load_snapshot().await?;
        Ok(compute_stats(&categories, &index).summary())
    }

    /// The category forest with document counts.
    pub async fn category_tree(&self) -> AppResult<Vec<TreeBranch<CategoryWithCount>>> {
        let (categories, index) = self.load_snapshot().await?;
        Ok(build_tree(&with_counts(categories, &index)))
    }

    /// Stored-state inconsistencies. Empty for a healthy tree.
    pub async fn integrity_report(&self) -> AppResult<Vec<IntegrityIssue>> {
        let categories = CategoryRepo::list_all(self.pool).await?;
        let issues = find_integrity_issues(&categories);
        if !issues.is_empty() {
            tracing::warn!(count = issues.len(), "Category integrity issues found");
        }
        Ok(issues)
    }

    /// Ids of documents filed under a category, optionally including its subtree.
    pub async fn documents_in_category(
        &self,
        id: DbId,
        include_descendants: bool,
    ) -> AppResult<Vec<DbId>> {
        let (categories, index) = self.load_snapshot().await?;
        if !categories.iter().any(|c| c.id == id) {
            return Err(CoreError::NotFound {
                entity: CATEGORY_ENTITY,
                id,
            }
            .into());
        }
        Ok(documents_in_category(
            &categories,
            &index,
            id,
            include_descendants,
        ))
    }

    // -----------------------------------------------------------------------
    // Document associations
    // -----------------------------------------------------------------------

    /// The categories a document is filed under.
    pub async fn document_categories(&self, document_id: DbId) -> AppResult<Vec<DocumentCategory>> {
        Ok(DocumentCategoryRepo::list_for_document(self.pool, document_id).await?)
    }

    /// Replace the categories a document is filed under.
    ///
    /// Every id must reference an existing category; duplicates are ignored.
    /// Runs under the hierarchy lock, so an unknown id is always a 404.
    pub async fn set_document_categories(
        &self,
        document_id: DbId,
        input: SetDocumentCategories,
    ) -> AppResult<Vec<DocumentCategory>> {
        input.validate().map_err(CoreError::from)?;
        let category_ids: Vec<DbId> = input
            .category_ids
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut tx = self.pool.begin().await?;
        // Held until commit so a concurrent delete cannot remove a checked id.
        CategoryRepo::lock_hierarchy(&mut tx).await?;
        let existing = CategoryRepo::list_all(&mut *tx).await?;
        if let Some(missing) = category_ids
            .iter()
            .find(|id| !existing.iter().any(|c| c.id == **id))
        {
            return Err(CoreError::NotFound {
                entity: CATEGORY_ENTITY,
                id: *missing,
            }
            .into());
        }

        let rows =
            DocumentCategoryRepo::replace_for_document(&mut tx, document_id, &category_ids).await?;
        tx.commit().await?;

        Ok(rows)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Categories and associations read from one repeatable-read snapshot so
    /// counts and totals agree with each other.
    async fn load_snapshot(&self) -> AppResult<(Vec<Category>, DocumentCategoryIndex)> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
        let categories = CategoryRepo::list_all(&mut *tx).await?;
        let index = DocumentCategoryRepo::load_index(&mut *tx).await?;
        tx.commit().await?;
        Ok((categories, index))
    }
}

/// Attach document counts and sort for display.
fn with_counts(categories: Vec<Category>, index: &DocumentCategoryIndex) -> Vec<CategoryWithCount> {
    let stats = compute_stats(&categories, index);
    let mut rows: Vec<CategoryWithCount> = categories
        .into_iter()
        .map(|category| CategoryWithCount {
            document_count: stats.count_for(category.id),
            category,
        })
        .collect();
    sort_for_display(&mut rows);
    rows
}

fn duplicate_name(name: &str) -> CoreError {
    CoreError::Conflict(format!("A category named '{name}' already exists"))
}
