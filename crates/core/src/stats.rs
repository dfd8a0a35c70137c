//! Document counts and aggregate statistics over the category collection.
//!
//! Counts are always derived from the document/category association index at
//! request time. Nothing here is cached.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::category::CategoryNode;
use crate::hierarchy::descendant_ids;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Association index
// ---------------------------------------------------------------------------

/// Document to category associations, keyed by document.
///
/// Built from `(document_id, category_id)` pairs. Duplicate pairs collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentCategoryIndex {
    by_document: BTreeMap<DbId, BTreeSet<DbId>>,
}

impl DocumentCategoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, document_id: DbId, category_id: DbId) {
        self.by_document
            .entry(document_id)
            .or_default()
            .insert(category_id);
    }

    /// Category ids associated with `document_id`.
    pub fn categories_of(&self, document_id: DbId) -> impl Iterator<Item = DbId> + '_ {
        self.by_document
            .get(&document_id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Documents associated with any of `category_ids`, ascending.
    pub fn documents_in(&self, category_ids: &HashSet<DbId>) -> Vec<DbId> {
        self.by_document
            .iter()
            .filter(|(_, cats)| cats.iter().any(|c| category_ids.contains(c)))
            .map(|(doc, _)| *doc)
            .collect()
    }
}

impl FromIterator<(DbId, DbId)> for DocumentCategoryIndex {
    fn from_iter<I: IntoIterator<Item = (DbId, DbId)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (document_id, category_id) in iter {
            index.insert(document_id, category_id);
        }
        index
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Full statistics, including per-category counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub total_categories: i64,
    /// Distinct documents with at least one known category.
    pub total_documents: i64,
    /// Every known category, with 0 for unused ones.
    pub per_category: BTreeMap<DbId, i64>,
    pub average_per_category: i64,
}

/// The subset of [`CategoryStats`] shown on dashboards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStatsSummary {
    pub total_categories: i64,
    pub total_documents: i64,
    pub average_per_category: i64,
}

impl CategoryStats {
    pub fn summary(&self) -> CategoryStatsSummary {
        CategoryStatsSummary {
            total_categories: self.total_categories,
            total_documents: self.total_documents,
            average_per_category: self.average_per_category,
        }
    }

    /// Document count for one category; 0 when unknown.
    pub fn count_for(&self, category_id: DbId) -> i64 {
        self.per_category.get(&category_id).copied().unwrap_or(0)
    }
}

/// `round(total_documents / total_categories)`, or 0 with no categories.
///
/// Halves round away from zero.
pub fn average_per_category(total_documents: i64, total_categories: i64) -> i64 {
    if total_categories == 0 {
        return 0;
    }
    (total_documents as f64 / total_categories as f64).round() as i64
}

/// Compute statistics for `categories` from the association `index`.
///
/// Associations pointing at categories outside `categories` are ignored, so
/// per-category counts and the document total share one denominator.
pub fn compute_stats<T: CategoryNode>(
    categories: &[T],
    index: &DocumentCategoryIndex,
) -> CategoryStats {
    let mut per_category: BTreeMap<DbId, i64> = categories.iter().map(|c| (c.id(), 0)).collect();
    let mut total_documents = 0;

    for cats in index.by_document.values() {
        let mut counted = false;
        for category_id in cats {
            if let Some(count) = per_category.get_mut(category_id) {
                *count += 1;
                counted = true;
            }
        }
        if counted {
            total_documents += 1;
        }
    }

    let total_categories = categories.len() as i64;

    CategoryStats {
        total_categories,
        total_documents,
        per_category,
        average_per_category: average_per_category(total_documents, total_categories),
    }
}

/// Documents filed under `category_id`, optionally including its whole subtree.
pub fn documents_in_category<T: CategoryNode>(
    categories: &[T],
    index: &DocumentCategoryIndex,
    category_id: DbId,
    include_descendants: bool,
) -> Vec<DbId> {
    let mut scope = HashSet::from([category_id]);
    if include_descendants {
        scope.extend(descendant_ids(categories, category_id));
    }
    index.documents_in(&scope)
}
