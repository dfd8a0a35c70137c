//! Category field rules, name normalization and display ordering.

use std::cmp::Ordering;

use validator::ValidationError;

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Node abstraction
// ---------------------------------------------------------------------------

/// Read access to the hierarchy fields of a stored category.
///
/// Implemented by the persisted row type so validation and aggregation run
/// directly over a loaded snapshot without copying.
pub trait CategoryNode {
    fn id(&self) -> DbId;
    fn name(&self) -> &str;
    fn parent_id(&self) -> Option<DbId>;
    /// Ancestor ids from root to immediate parent.
    fn path(&self) -> &[DbId];
    fn depth(&self) -> i32;
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Trim surrounding whitespace from a category name.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_string()
}

/// Key used for global name uniqueness: trimmed and lower-cased.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Trim optional free text; blank input becomes `None`.
pub fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Whether `name` collides with any existing category other than `except_id`.
pub fn is_name_taken<T: CategoryNode>(nodes: &[T], name: &str, except_id: Option<DbId>) -> bool {
    let key = name_key(name);
    nodes
        .iter()
        .any(|n| Some(n.id()) != except_id && name_key(n.name()) == key)
}

// ---------------------------------------------------------------------------
// Custom validators (used by `#[validate(custom(...))]` on request DTOs)
// ---------------------------------------------------------------------------

/// Accepts `#RRGGBB` hex colors.
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("hex_color");
        err.message = Some("Color must be a hex value like #1A2B3C".into());
        Err(err)
    }
}

/// Rejects names that are empty once trimmed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Name must not be empty".into());
        return Err(err);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Display ordering
// ---------------------------------------------------------------------------

/// Parents before children (`depth` ascending), then case-insensitive name,
/// then id so the order is total.
///
/// Names ascend within a depth: `Zeta`(2), `Beta`(0), `Mid`(1), `Alpha`(0)
/// sorts to `Alpha`, `Beta`, `Mid`, `Zeta`, not with `Beta` first.
pub fn compare_for_display<T: CategoryNode>(a: &T, b: &T) -> Ordering {
    a.depth()
        .cmp(&b.depth())
        .then_with(|| a.name().to_lowercase().cmp(&b.name().to_lowercase()))
        .then_with(|| a.id().cmp(&b.id()))
}

/// Sort categories in place for display.
pub fn sort_for_display<T: CategoryNode>(nodes: &mut [T]) {
    nodes.sort_by(compare_for_display);
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::CategoryNode;
    use crate::types::DbId;

    /// Minimal in-memory category used by unit tests across the crate.
    #[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
    pub struct Node {
        pub id: DbId,
        pub name: String,
        pub parent_id: Option<DbId>,
        pub path: Vec<DbId>,
        pub depth: i32,
    }

    impl Node {
        pub fn root(id: DbId, name: &str) -> Self {
            Self {
                id,
                name: name.to_string(),
                parent_id: None,
                path: Vec::new(),
                depth: 0,
            }
        }

        pub fn child_of(id: DbId, name: &str, parent: &Node) -> Self {
            let mut path = parent.path.clone();
            path.push(parent.id);
            Self {
                id,
                name: name.to_string(),
                parent_id: Some(parent.id),
                depth: path.len() as i32,
                path,
            }
        }
    }

    impl CategoryNode for Node {
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
}

#[cfg(test)]
mod tests {
    use super::test_support::Node;
    use super::*;

    fn at_depth(id: DbId, name: &str, depth: i32) -> Node {
        Node {
            id,
            name: name.to_string(),
            parent_id: None,
            path: (0..depth as DbId).collect(),
            depth,
        }
    }

    // -- normalization -------------------------------------------------------

    #[test]
    fn normalize_name_trims() {
        assert_eq!(normalize_name("  Guides \n"), "Guides");
    }

    #[test]
    fn name_key_ignores_case_and_whitespace() {
        assert_eq!(name_key(" Guides "), name_key("guides"));
    }

    #[test]
    fn blank_optional_text_becomes_none() {
        assert_eq!(normalize_optional_text(Some("   ")), None);
        assert_eq!(normalize_optional_text(None), None);
        assert_eq!(
            normalize_optional_text(Some(" about ")),
            Some("about".to_string())
        );
    }

    #[test]
    fn name_taken_excludes_self() {
        let nodes = vec![Node::root(1, "Guides"), Node::root(2, "API")];
        assert!(is_name_taken(&nodes, "guides", None));
        assert!(!is_name_taken(&nodes, "Guides", Some(1)));
        assert!(is_name_taken(&nodes, "api ", Some(1)));
        assert!(!is_name_taken(&nodes, "Tutorials", None));
    }

    // -- validators ----------------------------------------------------------

    #[test]
    fn hex_color_accepts_six_digit_hex() {
        assert!(validate_hex_color("#1a2B3c").is_ok());
    }

    #[test]
    fn hex_color_rejects_other_shapes() {
        assert!(validate_hex_color("1a2b3c").is_err());
        assert!(validate_hex_color("#12345").is_err());
        assert!(validate_hex_color("#12345G").is_err());
        assert!(validate_hex_color("red").is_err());
    }

    #[test]
    fn blank_name_rejected() {
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("Docs").is_ok());
    }

    // -- display ordering ----------------------------------------------------

    #[test]
    fn sorts_by_depth_then_name() {
        let mut nodes = vec![
            at_depth(1, "Zeta", 2),
            at_depth(2, "Beta", 0),
            at_depth(3, "Mid", 1),
            at_depth(4, "Alpha", 0),
        ];
        sort_for_display(&mut nodes);
        let names: Vec<&str> = nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Mid", "Zeta"]);
    }

    #[test]
    fn name_tie_break_is_case_insensitive() {
        let mut nodes = vec![
            at_depth(1, "beta", 0),
            at_depth(2, "Alpha", 0),
            at_depth(3, "alpha two", 0),
        ];
        sort_for_display(&mut nodes);
        let names: Vec<&str> = nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "alpha two", "beta"]);
    }

    #[test]
    fn identical_names_fall_back_to_id() {
        let mut nodes = vec![at_depth(9, "Same", 0), at_depth(3, "same", 0)];
        sort_for_display(&mut nodes);
        assert_eq!(nodes[0].id, 3);
    }
}
