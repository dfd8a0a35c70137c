//! Repository for the `categories` table.
//!
//! Read helpers accept any executor (pool, connection or transaction). Write
//! helpers take a `&mut PgConnection` and are meant to run inside a
//! transaction that has already called [`CategoryRepo::lock_hierarchy`].

use docshelf_core::hierarchy::PathUpdate;
use docshelf_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::category::{Category, CategoryRecord};

/// Column list for `categories` queries.
const COLUMNS: &str = "\
    id, name, description, parent_id, path, depth, icon, color, \
    created_at, updated_at";

/// Provides persistence for category records.
pub struct CategoryRepo;

impl CategoryRepo {
    // -----------------------------------------------------------------------
    // Locking
    // -----------------------------------------------------------------------

    /// Serialize hierarchy mutations for the rest of the current transaction.
    ///
    /// `SHARE ROW EXCLUSIVE` conflicts with itself but not with the
    /// `ACCESS SHARE` lock taken by plain `SELECT`s, so writers queue behind
    /// each other while readers keep going.
    pub async fn lock_hierarchy(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        sqlx::query("LOCK TABLE categories IN SHARE ROW EXCLUSIVE MODE")
            .execute(conn)
            .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Find a category by its ID.
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List every category, parents before children.
    pub async fn list_all<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY depth, lower(name), id");
        sqlx::query_as::<_, Category>(&query)
            .fetch_all(executor)
            .await
    }

    /// Total number of categories.
    pub async fn count<'e, E: PgExecutor<'e>>(executor: E) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(executor)
            .await?;
        Ok(count)
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Insert a new category at `path`.
    pub async fn insert(
        conn: &mut PgConnection,
        record: &CategoryRecord,
        path: &[DbId],
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, description, parent_id, path, depth, icon, color) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&record.name)
            .bind(&record.description)
            .bind(record.parent_id)
            .bind(path)
            .bind(path.len() as i32)
            .bind(&record.icon)
            .bind(&record.color)
            .fetch_one(conn)
            .await
    }

    /// Overwrite the editable fields of a category.
    ///
    /// Returns `None` if no category with the given ID exists.
    pub async fn update_record(
        conn: &mut PgConnection,
        id: DbId,
        record: &CategoryRecord,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET \
                 name = $2, \
                 description = $3, \
                 parent_id = $4, \
                 icon = $5, \
                 color = $6 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(&record.name)
            .bind(&record.description)
            .bind(record.parent_id)
            .bind(&record.icon)
            .bind(&record.color)
            .fetch_optional(conn)
            .await
    }

    /// Write new `path`/`depth` values, one row per update.
    ///
    /// Returns the number of rows changed.
    pub async fn apply_path_updates(
        conn: &mut PgConnection,
        updates: &[PathUpdate],
    ) -> Result<u64, sqlx::Error> {
        let mut changed = 0;
        for update in updates {
            let result = sqlx::query("UPDATE categories SET path = $2, depth = $3 WHERE id = $1")
                .bind(update.id)
                .bind(&update.path)
                .bind(update.depth())
                .execute(&mut *conn)
                .await?;
            changed += result.rows_affected();
        }
        Ok(changed)
    }

    /// Delete a category by ID.
    ///
    /// Returns `true` if a row was deleted. Fails with a foreign-key violation
    /// if the category still has children.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
