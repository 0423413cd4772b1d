//! Navigation menu types shared by configuration and content.

use serde::{Deserialize, Serialize};

/// Namespace of the primary navigation menu.
pub const MAIN_MENU: &str = "main";

/// A single navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MenuEntry {
    /// Unique key within its menu.
    pub identifier: String,

    /// Display label.
    pub name: String,

    /// Target path or absolute URL.
    pub url: String,

    /// Sort weight; lower sorts first.
    #[serde(default)]
    pub weight: i64,
}

/// A menu entry contributed by a page, tagged with the menu it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuDeclaration {
    /// Menu namespace (e.g. `main`).
    pub menu: String,

    /// The entry itself, with page defaults already applied.
    #[serde(flatten)]
    pub entry: MenuEntry,
}
