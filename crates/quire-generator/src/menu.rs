//! Menu assembly.
//!
//! Merges menu entries declared in the site configuration with entries
//! declared by pages into one ordered list per menu namespace.

use std::collections::BTreeMap;

use quire_core::{ContentEntry, MenuEntry};
use thiserror::Error;
use tracing::debug;

/// Menu namespace → entries in display order.
pub type Menus = BTreeMap<String, Vec<MenuEntry>>;

/// Where a menu entry was declared.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum MenuSource {
    /// The `[[menu.<name>]]` tables of the site configuration.
    Config,
    /// A page's frontmatter, by entry path.
    Page(String),
}

impl std::fmt::Display for MenuSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config => f.write_str("site configuration"),
            Self::Page(path) => f.write_str(path),
        }
    }
}

/// An entry together with the menu and source that declared it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcedEntry {
    pub menu: String,
    pub entry: MenuEntry,
    pub source: MenuSource,
}

/// Menu assembly errors.
#[derive(Debug, Error)]
pub enum MenuError {
    /// Two different entries share an identifier within one menu.
    #[error(
        "conflicting menu entry '{identifier}' in menu '{menu}': declared by {} and {}",
        .first.source,
        .second.source
    )]
    Conflicting {
        menu: String,
        identifier: String,
        first: Box<SourcedEntry>,
        second: Box<SourcedEntry>,
    },
}

/// Result type for menu assembly.
pub type Result<T> = std::result::Result<T, MenuError>;

/// Gather every declaration from configuration and pages.
pub fn declarations(
    config_entries: &[(String, MenuEntry)],
    entries: &[ContentEntry],
) -> Vec<SourcedEntry> {
    let from_config = config_entries.iter().map(|(menu, entry)| SourcedEntry {
        menu: menu.clone(),
        entry: entry.clone(),
        source: MenuSource::Config,
    });

    let from_pages = entries.iter().flat_map(|page| {
        page.kind.menus().iter().map(|decl| SourcedEntry {
            menu: decl.menu.clone(),
            entry: decl.entry.clone(),
            source: MenuSource::Page(page.path.clone()),
        })
    });

    from_config.chain(from_pages).collect()
}

/// Assemble menus from configuration entries and page declarations.
///
/// Identical declarations of the same identifier collapse into one entry;
/// differing ones are a [`MenuError::Conflicting`]. The result does not
/// depend on the order of either input.
pub fn assemble(
    config_entries: &[(String, MenuEntry)],
    entries: &[ContentEntry],
) -> Result<Menus> {
    let mut all = declarations(config_entries, entries);

    // Canonical order so the reported conflict is stable.
    all.sort_by(|a, b| {
        a.menu
            .cmp(&b.menu)
            .then_with(|| a.entry.identifier.cmp(&b.entry.identifier))
            .then_with(|| a.source.cmp(&b.source))
    });

    let mut by_identifier: BTreeMap<(String, String), SourcedEntry> = BTreeMap::new();
    for declared in all {
        let key = (declared.menu.clone(), declared.entry.identifier.clone());
        match by_identifier.get(&key) {
            Some(existing) if existing.entry == declared.entry => {
                debug!(
                    menu = %declared.menu,
                    identifier = %declared.entry.identifier,
                    source = %declared.source,
                    "duplicate menu entry collapsed"
                );
            }
            Some(existing) => {
                return Err(MenuError::Conflicting {
                    menu: declared.menu.clone(),
                    identifier: declared.entry.identifier.clone(),
                    first: Box::new(existing.clone()),
                    second: Box::new(declared),
                });
            }
            None => {
                by_identifier.insert(key, declared);
            }
        }
    }

    let mut menus = Menus::new();
    for ((menu, _), declared) in by_identifier {
        menus.entry(menu).or_default().push(declared.entry);
    }
    for items in menus.values_mut() {
        items.sort_by(compare_entries);
    }

    Ok(menus)
}

/// Display order: weight ascending, then name, then identifier.
pub fn compare_entries(a: &MenuEntry, b: &MenuEntry) -> std::cmp::Ordering {
    a.weight
        .cmp(&b.weight)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.identifier.cmp(&b.identifier))
}
