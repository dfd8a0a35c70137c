//! Repository for the `document_categories` junction table.
//!
//! The document service owns these associations; the category core only
//! reads them to derive counts.

use docshelf_core::stats::DocumentCategoryIndex;
use docshelf_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::document_category::DocumentCategory;

/// Column list for `document_categories` queries.
const COLUMNS: &str = "id, document_id, category_id, created_at, updated_at";

/// Provides access to document/category associations.
pub struct DocumentCategoryRepo;

impl DocumentCategoryRepo {
    /// Load every association into an index keyed by document.
    pub async fn load_index<'e, E: PgExecutor<'e>>(
        executor: E,
    ) -> Result<DocumentCategoryIndex, sqlx::Error> {
        let pairs: Vec<(DbId, DbId)> =
            sqlx::query_as("SELECT document_id, category_id FROM document_categories")
                .fetch_all(executor)
                .await?;
        Ok(pairs.into_iter().collect())
    }

    /// Associations of one document, ordered by category id.
    pub async fn list_for_document<'e, E: PgExecutor<'e>>(
        executor: E,
        document_id: DbId,
    ) -> Result<Vec<DocumentCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM document_categories \
             WHERE document_id = $1 \
             ORDER BY category_id"
        );
        sqlx::query_as::<_, DocumentCategory>(&query)
            .bind(document_id)
            .fetch_all(executor)
            .await
    }

    /// Replace the categories of a document with `category_ids`.
    ///
    /// Associations not in the list are removed; existing ones are kept as is.
    /// Must run inside a transaction to be atomic.
    pub async fn replace_for_document(
        conn: &mut PgConnection,
        document_id: DbId,
        category_ids: &[DbId],
    ) -> Result<Vec<DocumentCategory>, sqlx::Error> {
        sqlx::query(
            "DELETE FROM document_categories \
             WHERE document_id = $1 AND NOT (category_id = ANY($2))",
        )
        .bind(document_id)
        .bind(category_ids)
        .execute(&mut *conn)
        .await?;

        sqlx::query(
            "INSERT INTO document_categories (document_id, category_id) \
             SELECT $1, UNNEST($2::bigint[]) \
             ON CONFLICT (document_id, category_id) DO NOTHING",
        )
        .bind(document_id)
        .bind(category_ids)
        .execute(&mut *conn)
        .await?;

        Self::list_for_document(&mut *conn, document_id).await
    }
}
