//! Content collection.
//!
//! Walks the content directory and loads every content file into an
//! immutable [`ContentEntry`]. Files are parsed in parallel; results are only
//! merged once every file has been read, so a failing file always fails the
//! whole collection and the reported failure does not depend on scheduling.

use std::{
    cmp::Ordering,
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use quire_core::{Config, ContentEntry, CoreError, content::is_content_file};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Content collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// A content file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Frontmatter or entry validation error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Two source files resolve to the same output URL.
    #[error("duplicate entry for {url}: {first} and {second}")]
    DuplicateEntry {
        url: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Content collector that walks directories and parses files.
#[derive(Debug)]
pub struct ContentCollector {
    content_dir: PathBuf,
    post_sections: Vec<String>,
    drafts: bool,
}

impl ContentCollector {
    /// Create a new content collector.
    #[must_use]
    pub fn new(config: &Config, content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
            post_sections: config.content.post_sections.clone(),
            drafts: config.build.drafts,
        }
    }

    /// Collect all entries from the content directory, sorted by path.
    pub fn collect(&self) -> Result<Vec<ContentEntry>> {
        info!(dir = %self.content_dir.display(), "collecting content");

        let files = self.find_content_files()?;
        info!(count = files.len(), "found content files");

        // Order-preserving: results line up with the sorted file list.
        let parsed: Vec<Result<ContentEntry>> =
            files.par_iter().map(|path| self.parse_file(path)).collect();

        let mut entries = Vec::with_capacity(parsed.len());
        for result in parsed {
            entries.push(result?);
        }

        let total = entries.len();
        if !self.drafts {
            entries.retain(|entry| {
                if entry.draft {
                    debug!(path = %entry.path, "skipping draft");
                }
                !entry.draft
            });
        }

        check_unique_urls(&entries)?;

        info!(
            entries = entries.len(),
            drafts_skipped = total - entries.len(),
            posts = entries.iter().filter(|e| e.is_post()).count(),
            "content collection complete"
        );

        Ok(entries)
    }

    /// Find all content files, relative to the content root, sorted by path.
    fn find_content_files(&self) -> Result<Vec<PathBuf>> {
        if !self.content_dir.exists() {
            warn!(dir = %self.content_dir.display(), "content directory does not exist");
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.content_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() && is_content_file(entry.path()) {
                let relative = entry
                    .path()
                    .strip_prefix(&self.content_dir)
                    .unwrap_or(entry.path())
                    .to_path_buf();
                files.push(relative);
            }
        }

        // Same ordering as `ContentEntry::path` comparisons.
        files.sort_by_key(|p| p.to_string_lossy().replace('\\', "/"));
        Ok(files)
    }

    /// Parse a single content file into an entry.
    fn parse_file(&self, relative: &Path) -> Result<ContentEntry> {
        debug!(path = %relative.display(), "parsing file");

        let full = self.content_dir.join(relative);
        let raw = fs::read_to_string(&full).map_err(|source| CollectorError::Read {
            path: full.clone(),
            source,
        })?;

        Ok(ContentEntry::parse(relative, &raw, &self.post_sections)?)
    }

    /// Get posts sorted by date (newest first), ties broken by path.
    pub fn posts_by_date(entries: &[ContentEntry]) -> Vec<&ContentEntry> {
        let mut posts: Vec<_> = entries.iter().filter(|e| e.is_post()).collect();
        posts.sort_by(|a, b| compare_by_date(a, b));
        posts
    }
}

/// Listing order: date descending, undated entries last, ties by path ascending.
pub fn compare_by_date(a: &ContentEntry, b: &ContentEntry) -> Ordering {
    match (&b.date, &a.date) {
        (Some(b_date), Some(a_date)) => b_date.cmp(a_date),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.path.cmp(&b.path))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// Reject entries that resolve to the same output URL.
///
/// `entries` must be sorted by path so `first` is always the smaller path.
fn check_unique_urls(entries: &[ContentEntry]) -> Result<()> {
    let mut seen: HashMap<&str, &str> = HashMap::with_capacity(entries.len());
    for entry in entries {
        if let Some(first) = seen.insert(&entry.url, &entry.path) {
            return Err(CollectorError::DuplicateEntry {
                url: entry.url.clone(),
                first: PathBuf::from(first),
                second: PathBuf::from(&entry.path),
            });
        }
    }
    Ok(())
}
