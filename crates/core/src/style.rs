//! Deterministic presentation defaults (icon and color) for categories.
//!
//! Used only when a create/update request does not carry an explicit value.
//! The same name always yields the same pair: there is no randomness and no
//! mutable state, only the constant lookup tables owned by [`StyleAssigner`].

use serde::Serialize;

// ---------------------------------------------------------------------------
// Built-in tables
// ---------------------------------------------------------------------------

/// Keyword to icon mapping. Order is significant: the first keyword found in
/// the lower-cased name wins.
pub const ICON_KEYWORDS: &[(&str, &str)] = &[
    ("getting started", "rocket"),
    ("tutorial", "graduation-cap"),
    ("guide", "book-open"),
    ("api", "code"),
    ("reference", "book-marked"),
    ("faq", "circle-help"),
    ("troubleshoot", "life-buoy"),
    ("security", "shield"),
    ("release", "tag"),
    ("changelog", "history"),
    ("design", "palette"),
    ("architecture", "network"),
    ("deploy", "cloud-upload"),
    ("config", "settings"),
    ("setup", "wrench"),
    ("test", "flask-conical"),
    ("data", "database"),
    ("policy", "scale"),
    ("meeting", "calendar"),
    ("note", "sticky-note"),
    ("research", "microscope"),
    ("marketing", "megaphone"),
    ("finance", "wallet"),
    ("team", "users"),
    ("project", "briefcase"),
];

/// Icon used when no keyword matches.
pub const FALLBACK_ICON: &str = "folder";

/// Color palette indexed by the name hash.
pub const PALETTE: &[&str] = &[
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899", "#06B6D4", "#84CC16",
    "#F97316", "#6366F1", "#14B8A6", "#A855F7",
];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// An (icon, color) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStyle {
    pub icon: String,
    pub color: String,
}

/// Computes default icon and color values from a category name.
#[derive(Debug, Clone, Copy)]
pub struct StyleAssigner {
    icon_keywords: &'static [(&'static str, &'static str)],
    fallback_icon: &'static str,
    palette: &'static [&'static str],
}

impl Default for StyleAssigner {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StyleAssigner {
    /// Assigner backed by [`ICON_KEYWORDS`], [`FALLBACK_ICON`] and [`PALETTE`].
    pub const fn builtin() -> Self {
        Self::with_tables(ICON_KEYWORDS, FALLBACK_ICON, PALETTE)
    }

    /// Assigner with caller-provided tables. `palette` must not be empty.
    pub const fn with_tables(
        icon_keywords: &'static [(&'static str, &'static str)],
        fallback_icon: &'static str,
        palette: &'static [&'static str],
    ) -> Self {
        Self {
            icon_keywords,
            fallback_icon,
            palette,
        }
    }

    /// Compute the default (icon, color) pair for `name`.
    pub fn assign_defaults(&self, name: &str) -> CategoryStyle {
        CategoryStyle {
            icon: self.icon_for(name).to_string(),
            color: self.color_for(name).to_string(),
        }
    }

    /// Fill in whichever of `icon` / `color` is missing. Explicit values are
    /// returned untouched.
    pub fn resolve(
        &self,
        name: &str,
        icon: Option<&str>,
        color: Option<&str>,
    ) -> CategoryStyle {
        CategoryStyle {
            icon: icon
                .map(str::to_string)
                .unwrap_or_else(|| self.icon_for(name).to_string()),
            color: color
                .map(str::to_string)
                .unwrap_or_else(|| self.color_for(name).to_string()),
        }
    }

    /// First matching keyword's icon, or the fallback.
    pub fn icon_for(&self, name: &str) -> &'static str {
        let lowered = name.to_lowercase();
        self.icon_keywords
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword))
            .map(|(_, icon)| *icon)
            .unwrap_or(self.fallback_icon)
    }

    /// Palette entry selected by [`name_hash`].
    pub fn color_for(&self, name: &str) -> &'static str {
        let index = name_hash(name).unsigned_abs() as usize % self.palette.len();
        self.palette[index]
    }
}

/// Rolling hash `h = unit + ((h << 5) - h)` over the UTF-16 code units of
/// `name`, with 32-bit wrapping arithmetic.
pub fn name_hash(name: &str) -> i32 {
    name.encode_utf16().fold(0i32, |hash, unit| {
        i32::from(unit).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    })
}
