//! Symbolic icon selection for tray entries.
//!
//! [`resolve`] decides whether an entry gets a catalog icon; `None` tells the
//! caller to fall back to a literal glyph or a text badge. [`EmojiDetector`]
//! is the predicate the renderer uses to pick the literal-glyph path.

pub mod emoji;

pub use emoji::{EmojiDetector, UnicodeEmoji};

use serde::Serialize;
use std::fmt;
use tray_core::EntryKind;

/// Highest workspace number with a catalog icon.
pub const MAX_NUMBERED_ICON: u32 = 50;

/// Icon outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IconShape {
    Circle,
    Square,
    SquareFill,
}

impl IconShape {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Circle     => "circle",
            Self::Square     => "square",
            Self::SquareFill => "square.fill",
        }
    }
}

/// Catalog icon identifier, displayed as `"<key>.<shape>"`
/// (e.g. `"7.square.fill"`, `"s.circle"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct IconId {
    /// Lowercase letter or decimal number drawn inside the shape.
    pub key:   String,
    pub shape: IconShape,
}

impl fmt::Display for IconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.key, self.shape.as_str())
    }
}

/// Resolve the catalog icon for an entry.
///
/// - Mode: a single ASCII letter, drawn in a circle.
/// - Workspace: an integer in `0..=50` or a single ASCII letter (any case),
///   drawn in a filled square when active and an outlined one otherwise.
///
/// Everything else, including names containing emoji, yields `None`.
pub fn resolve(kind: EntryKind, name: &str, is_active: bool) -> Option<IconId> {
    match kind {
        EntryKind::Mode => single_letter(name).map(|key| IconId {
            key,
            shape: IconShape::Circle,
        }),
        EntryKind::Workspace => {
            let key = number_key(name).or_else(|| single_letter(name))?;
            let shape = if is_active { IconShape::SquareFill } else { IconShape::Square };
            Some(IconId { key, shape })
        }
    }
}

fn single_letter(name: &str) -> Option<String> {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_lowercase().to_string()),
        _ => None,
    }
}

fn number_key(name: &str) -> Option<String> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number: u32 = name.parse().ok()?;
    (number <= MAX_NUMBERED_ICON).then(|| number.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ws(name: &str, active: bool) -> Option<String> {
        resolve(EntryKind::Workspace, name, active).map(|id| id.to_string())
    }

    #[test]
    fn numbered_workspace_boundaries() {
        assert_eq!(ws("0", false).as_deref(), Some("0.square"));
        assert_eq!(ws("50", true).as_deref(), Some("50.square.fill"));
        assert_eq!(ws("51", true), None);
        assert_eq!(ws("-1", true), None);
    }

    #[test]
    fn leading_zeros_use_canonical_key() {
        assert_eq!(ws("07", false).as_deref(), Some("7.square"));
    }

    #[test]
    fn letters_are_case_insensitive() {
        assert_eq!(ws("B", true).as_deref(), Some("b.square.fill"));
        assert_eq!(ws("b", false).as_deref(), Some("b.square"));
    }

    #[test]
    fn other_names_have_no_icon() {
        assert_eq!(ws("AB", false), None);
        assert_eq!(ws("web", true), None);
        assert_eq!(ws("é", true), None);
        assert_eq!(ws("🦀", true), None);
        assert_eq!(ws("", true), None);
        assert_eq!(ws("99999999999999999999", true), None);
    }

    #[test]
    fn mode_icons_are_circles() {
        let id = resolve(EntryKind::Mode, "S", true).unwrap();
        assert_eq!(id.to_string(), "s.circle");
        assert_eq!(resolve(EntryKind::Mode, "S", false), Some(id));
    }

    #[test]
    fn mode_icons_are_letters_only() {
        assert_eq!(resolve(EntryKind::Mode, "1", true), None);
        assert_eq!(resolve(EntryKind::Mode, "SERVICE", true), None);
    }
}
