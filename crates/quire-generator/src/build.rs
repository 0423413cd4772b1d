//! Build orchestration.
//!
//! Runs loading, indexing, menu assembly and pagination in order and
//! produces one immutable [`SiteModel`]. Any stage failing aborts the build;
//! no partial model is ever returned or written.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use quire_core::{Config, ContentEntry, CoreError, MAIN_MENU, MenuEntry};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    collector::{CollectorError, ContentCollector},
    menu::{self, MenuError, Menus},
    paginate::Listing,
    taxonomy::{TagIndex, TaxonomyIndex, term_slug},
};

/// File name of the serialized site model inside the output directory.
pub const SITE_JSON: &str = "site.json";

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Collector error.
    #[error("collector error: {0}")]
    Collector(#[from] CollectorError),

    /// Menu assembly error.
    #[error("menu error: {0}")]
    Menu(#[from] MenuError),

    /// Configuration error.
    #[error("config error: {0}")]
    Core(#[from] CoreError),

    /// Serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Two outputs of the model resolve to the same URL.
    #[error("duplicate URL '{url}': {first} and {second}")]
    DuplicateUrl {
        url: String,
        first: String,
        second: String,
    },
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// The fully assembled site, handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteModel {
    pub title: String,
    pub base_url: String,
    #[serde(default)]
    pub theme: Option<String>,

    /// Opaque theme parameters.
    #[serde(default)]
    pub params: toml::Table,

    /// All published entries, sorted by path.
    pub entries: Vec<ContentEntry>,

    pub taxonomies: TaxonomyIndex,

    pub menus: Menus,

    /// Posts, newest first.
    pub home: Listing,

    /// Tag → listing of tagged entries.
    pub tag_pages: BTreeMap<String, Listing>,

    /// Category → listing of entries in the category.
    pub category_pages: BTreeMap<String, Listing>,
}

impl SiteModel {
    /// Entries of the `main` menu in display order.
    pub fn navigation(&self) -> &[MenuEntry] {
        self.menu(MAIN_MENU)
    }

    /// Entries of a menu, empty if nothing declared it.
    pub fn menu(&self, name: &str) -> &[MenuEntry] {
        self.menus.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Look up an entry by source path.
    pub fn entry(&self, path: &str) -> Option<&ContentEntry> {
        self.entries
            .binary_search_by(|e| e.path.as_str().cmp(path))
            .ok()
            .map(|i| &self.entries[i])
    }

    /// Resolve a listing page's paths to entries.
    pub fn resolve<'a>(
        &'a self,
        paths: &'a [String],
    ) -> impl Iterator<Item = &'a ContentEntry> + 'a {
        paths.iter().filter_map(|p| self.entry(p))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn stats(&self) -> BuildStats {
        let posts = self.entries.iter().filter(|e| e.is_post()).count();
        let listing_pages = self.home.total_pages()
            + self
                .tag_pages
                .values()
                .chain(self.category_pages.values())
                .map(Listing::total_pages)
                .sum::<usize>();

        BuildStats {
            entries: self.entries.len(),
            posts,
            pages: self.entries.len() - posts,
            tags: self.taxonomies.tags.len(),
            categories: self.taxonomies.categories.len(),
            menu_items: self.menus.values().map(Vec::len).sum(),
            listing_pages,
        }
    }
}

/// Build statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Number of published entries.
    pub entries: usize,

    pub posts: usize,

    pub pages: usize,

    /// Number of distinct tags.
    pub tags: usize,

    /// Number of distinct categories.
    pub categories: usize,

    /// Menu entries across all menus.
    pub menu_items: usize,

    /// Listing pages across home, tag and category listings.
    pub listing_pages: usize,
}

/// Site builder that orchestrates the build process.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    content_dir: PathBuf,
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(config: Config, content_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            content_dir: content_dir.into(),
        }
    }

    /// Execute the full pipeline.
    pub fn build(&self) -> Result<SiteModel> {
        let start = Instant::now();
        let page_size = self.config.page_size()?;

        info!(content = %self.content_dir.display(), page_size, "starting build");

        // 1. Load entries
        let entries = ContentCollector::new(&self.config, &self.content_dir).collect()?;

        // 2. Index taxonomies
        let taxonomies = TaxonomyIndex::build(&entries);
        info!(
            tags = taxonomies.tags.len(),
            categories = taxonomies.categories.len(),
            "taxonomies indexed"
        );

        // 3. Assemble menus
        let menus = menu::assemble(&self.config.menu_entries(), &entries)?;
        info!(menus = menus.len(), "menus assembled");

        // 4. Paginate listings
        let posts: Vec<String> = ContentCollector::posts_by_date(&entries)
            .into_iter()
            .map(|e| e.path.clone())
            .collect();
        let home = Listing::new("/", &posts, page_size)?;
        let tag_pages = term_listings("tags", &taxonomies.tags, page_size)?;
        let category_pages = term_listings("categories", &taxonomies.categories, page_size)?;
        info!(home_pages = home.total_pages(), "listings paginated");

        check_unique_output_urls(&entries, &home, &tag_pages, &category_pages)?;

        let model = SiteModel {
            title: self.config.title.clone(),
            base_url: self.config.base_url.clone(),
            theme: self.config.theme.clone(),
            params: self.config.params.clone(),
            entries,
            taxonomies,
            menus,
            home,
            tag_pages,
            category_pages,
        };

        info!(
            entries = model.entries.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "build complete"
        );

        Ok(model)
    }
}

fn term_listings(
    prefix: &str,
    index: &TagIndex,
    page_size: usize,
) -> Result<BTreeMap<String, Listing>> {
    index
        .iter()
        .map(|(term, paths)| {
            let url = format!("/{prefix}/{}/", term_slug(term));
            debug!(term, %url, entries = paths.len(), "paginating term");
            Ok((term.to_string(), Listing::new(url, paths, page_size)?))
        })
        .collect()
}

/// Reject any URL claimed by two outputs: entries, then the home listing,
/// then tag and category listings.
///
/// A `_index.md` entry may share the first page URL of a listing, since it
/// carries that listing's own content.
fn check_unique_output_urls(
    entries: &[ContentEntry],
    home: &Listing,
    tag_pages: &BTreeMap<String, Listing>,
    category_pages: &BTreeMap<String, Listing>,
) -> Result<()> {
    let mut owners: BTreeMap<&str, String> = BTreeMap::new();
    let mut section_indexes: BTreeMap<&str, &str> = BTreeMap::new();

    for entry in entries {
        if Path::new(&entry.path).file_name().is_some_and(|n| n == "_index.md") {
            section_indexes.insert(entry.url.as_str(), entry.path.as_str());
        }
        claim(&mut owners, &entry.url, format!("entry {}", entry.path))?;
    }

    let listings = std::iter::once(("home".to_string(), home))
        .chain(tag_pages.iter().map(|(t, l)| (format!("tags listing '{t}'"), l)))
        .chain(
            category_pages
                .iter()
                .map(|(t, l)| (format!("categories listing '{t}'"), l)),
        );

    for (name, listing) in listings {
        for page in &listing.pages {
            let url = page.url.as_str();
            if page.view.page_number == 1 && section_indexes.contains_key(url) {
                debug!(%url, index = section_indexes[url], "listing uses section index");
                continue;
            }
            claim(
                &mut owners,
                url,
                format!("{name} page {}", page.view.page_number),
            )?;
        }
    }

    Ok(())
}

fn claim<'a>(owners: &mut BTreeMap<&'a str, String>, url: &'a str, owner: String) -> Result<()> {
    if let Some(first) = owners.get(url) {
        return Err(BuildError::DuplicateUrl {
            url: url.to_string(),
            first: first.clone(),
            second: owner,
        });
    }
    owners.insert(url, owner);
    Ok(())
}

/// Write the model as pretty JSON to `<output_dir>/site.json`.
pub fn write_site_json(model: &SiteModel, output_dir: &Path) -> Result<PathBuf> {
    let json = model.to_json()?;
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(SITE_JSON);
    fs::write(&path, json)?;
    info!(path = %path.display(), "wrote site model");
    Ok(path)
}
