//! Parent/child legality checks and materialized-path maintenance.
//!
//! All functions take a snapshot of the category collection and never mutate
//! it. Callers read the snapshot while holding the hierarchy write lock, run
//! the checks here, then persist the returned plan in the same transaction.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::category::{compare_for_display, CategoryNode};
use crate::error::CoreError;
use crate::types::DbId;

/// Entity label used in `NotFound` errors.
pub const CATEGORY_ENTITY: &str = "Category";

// ---------------------------------------------------------------------------
// Parent validation
// ---------------------------------------------------------------------------

/// Why a proposed parent assignment was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParentRejection {
    #[error("Category {category_id} cannot be its own parent")]
    SelfParent { category_id: DbId },

    #[error("Moving category {category_id} under {parent_id} would create a cycle")]
    Cycle { category_id: DbId, parent_id: DbId },

    #[error("Parent category {parent_id} not found")]
    ParentNotFound { parent_id: DbId },
}

impl From<ParentRejection> for CoreError {
    fn from(rejection: ParentRejection) -> Self {
        match rejection {
            ParentRejection::ParentNotFound { parent_id } => CoreError::NotFound {
                entity: CATEGORY_ENTITY,
                id: parent_id,
            },
            other => CoreError::Conflict(other.to_string()),
        }
    }
}

/// Decide whether `category_id` may be placed under `proposed_parent_id`.
///
/// Rules in order: moving to root is always legal; a category cannot parent
/// itself; the proposed parent must not have `category_id` among its
/// ancestors; the proposed parent must exist. Re-assigning the current parent
/// passes.
pub fn can_set_parent<T: CategoryNode>(
    nodes: &[T],
    category_id: DbId,
    proposed_parent_id: Option<DbId>,
) -> Result<(), ParentRejection> {
    let Some(parent_id) = proposed_parent_id else {
        return Ok(());
    };

    if parent_id == category_id {
        return Err(ParentRejection::SelfParent { category_id });
    }

    match nodes.iter().find(|n| n.id() == parent_id) {
        Some(parent) if parent.path().contains(&category_id) => Err(ParentRejection::Cycle {
            category_id,
            parent_id,
        }),
        Some(_) => Ok(()),
        None => Err(ParentRejection::ParentNotFound { parent_id }),
    }
}

// ---------------------------------------------------------------------------
// Path computation
// ---------------------------------------------------------------------------

/// Materialized path for a category placed under `parent_id`:
/// `parent.path + [parent.id]`, or empty at the root.
pub fn path_under<T: CategoryNode>(
    nodes: &[T],
    parent_id: Option<DbId>,
) -> Result<Vec<DbId>, CoreError> {
    let Some(parent_id) = parent_id else {
        return Ok(Vec::new());
    };

    let parent = nodes
        .iter()
        .find(|n| n.id() == parent_id)
        .ok_or(CoreError::NotFound {
            entity: CATEGORY_ENTITY,
            id: parent_id,
        })?;

    let mut path = parent.path().to_vec();
    path.push(parent.id());
    Ok(path)
}

/// Depth for a materialized path.
pub fn depth_of(path: &[DbId]) -> i32 {
    path.len() as i32
}

/// New materialized path for one category as part of a reparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathUpdate {
    pub id: DbId,
    pub path: Vec<DbId>,
}

impl PathUpdate {
    pub fn depth(&self) -> i32 {
        depth_of(&self.path)
    }
}

/// Validate moving `category_id` under `new_parent_id` and compute the new
/// path of the category and of every descendant.
///
/// The first entry is always the moved category; descendants follow ordered
/// by their new depth. Returns an empty plan when the parent does not change.
pub fn plan_reparent<T: CategoryNode>(
    nodes: &[T],
    category_id: DbId,
    new_parent_id: Option<DbId>,
) -> Result<Vec<PathUpdate>, CoreError> {
    let node = nodes
        .iter()
        .find(|n| n.id() == category_id)
        .ok_or(CoreError::NotFound {
            entity: CATEGORY_ENTITY,
            id: category_id,
        })?;

    if node.parent_id() == new_parent_id {
        return Ok(Vec::new());
    }

    can_set_parent(nodes, category_id, new_parent_id)?;

    let new_path = path_under(nodes, new_parent_id)?;
    let mut prefix = new_path.clone();
    prefix.push(category_id);

    let mut descendants: Vec<PathUpdate> = nodes
        .iter()
        .filter_map(|n| {
            let pos = n.path().iter().position(|&a| a == category_id)?;
            let mut path = prefix.clone();
            path.extend_from_slice(&n.path()[pos + 1..]);
            Some(PathUpdate { id: n.id(), path })
        })
        .collect();
    descendants.sort_by(|a, b| a.path.len().cmp(&b.path.len()).then(a.id.cmp(&b.id)));

    let mut plan = Vec::with_capacity(descendants.len() + 1);
    plan.push(PathUpdate {
        id: category_id,
        path: new_path,
    });
    plan.extend(descendants);
    Ok(plan)
}

// ---------------------------------------------------------------------------
// Tree queries
// ---------------------------------------------------------------------------

/// Ids of the direct children of `category_id`.
pub fn child_ids<T: CategoryNode>(nodes: &[T], category_id: DbId) -> Vec<DbId> {
    nodes
        .iter()
        .filter(|n| n.parent_id() == Some(category_id))
        .map(|n| n.id())
        .collect()
}

/// Ids of every category below `category_id`, at any depth.
pub fn descendant_ids<T: CategoryNode>(nodes: &[T], category_id: DbId) -> Vec<DbId> {
    nodes
        .iter()
        .filter(|n| n.path().contains(&category_id))
        .map(|n| n.id())
        .collect()
}

/// A category together with its nested children.
#[derive(Debug, Clone, Serialize)]
pub struct TreeBranch<T> {
    #[serde(flatten)]
    pub node: T,
    pub children: Vec<TreeBranch<T>>,
}

/// Nest a flat category list into a forest.
///
/// Roots and siblings follow the display ordering. A node whose parent is
/// missing from the list is placed at the top level rather than dropped.
pub fn build_tree<T: CategoryNode + Clone>(nodes: &[T]) -> Vec<TreeBranch<T>> {
    let ids: HashSet<DbId> = nodes.iter().map(|n| n.id()).collect();
    let mut by_parent: HashMap<Option<DbId>, Vec<&T>> = HashMap::new();
    for node in nodes {
        let key = node.parent_id().filter(|p| ids.contains(p));
        by_parent.entry(key).or_default().push(node);
    }
    for siblings in by_parent.values_mut() {
        siblings.sort_by(|a, b| compare_for_display(*a, *b));
    }

    fn attach<T: CategoryNode + Clone>(
        parent: Option<DbId>,
        by_parent: &HashMap<Option<DbId>, Vec<&T>>,
    ) -> Vec<TreeBranch<T>> {
        by_parent
            .get(&parent)
            .map(|siblings| {
                siblings
                    .iter()
                    .map(|n| TreeBranch {
                        node: (*n).clone(),
                        children: attach(Some(n.id()), by_parent),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    attach(None, &by_parent)
}

// ---------------------------------------------------------------------------
// Integrity audit
// ---------------------------------------------------------------------------

/// A stored-state inconsistency found by [`find_integrity_issues`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityIssue {
    DanglingParent {
        category_id: DbId,
        parent_id: DbId,
    },
    Cycle {
        category_id: DbId,
    },
    PathMismatch {
        category_id: DbId,
        expected: Vec<DbId>,
        actual: Vec<DbId>,
    },
    DepthMismatch {
        category_id: DbId,
        depth: i32,
        path_len: usize,
    },
}

/// Walk every `parent_id` chain and compare it with the stored path and depth.
///
/// Path checks are skipped for categories whose chain is broken by a cycle or
/// a dangling parent, since no expected path exists for them.
pub fn find_integrity_issues<T: CategoryNode>(nodes: &[T]) -> Vec<IntegrityIssue> {
    let by_id: HashMap<DbId, &T> = nodes.iter().map(|n| (n.id(), n)).collect();
    let mut issues = Vec::new();

    for node in nodes {
        let id = node.id();

        if node.depth() as usize != node.path().len() {
            issues.push(IntegrityIssue::DepthMismatch {
                category_id: id,
                depth: node.depth(),
                path_len: node.path().len(),
            });
        }

        let mut ancestors = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut cursor = node.parent_id();
        let mut chain_ok = true;

        while let Some(parent_id) = cursor {
            if parent_id == id {
                issues.push(IntegrityIssue::Cycle { category_id: id });
                chain_ok = false;
                break;
            }
            if !seen.insert(parent_id) {
                // Cycle further up; reported on its own members.
                chain_ok = false;
                break;
            }
            let Some(parent) = by_id.get(&parent_id) else {
                if Some(parent_id) == node.parent_id() {
                    issues.push(IntegrityIssue::DanglingParent {
                        category_id: id,
                        parent_id,
                    });
                }
                chain_ok = false;
                break;
            };
            ancestors.push(parent_id);
            cursor = parent.parent_id();
        }

        if chain_ok {
            ancestors.reverse();
            if ancestors.as_slice() != node.path() {
                issues.push(IntegrityIssue::PathMismatch {
                    category_id: id,
                    expected: ancestors,
                    actual: node.path().to_vec(),
                });
            }
        }
    }

    issues
}
