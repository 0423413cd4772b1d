//! Pagination planning.
//!
//! Splits an ordered listing into fixed-size pages. Page 1 of a listing lives
//! at the listing's base URL, page `n` at `<base>/page/<n>/`.

use quire_core::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedView<T> {
    /// 1-based page number.
    pub page_number: usize,

    /// Number of pages in the listing (at least 1).
    pub total_pages: usize,

    /// Items on this page, in listing order.
    pub items: Vec<T>,
}

impl<T> PaginatedView<T> {
    pub fn has_prev(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }

    pub fn prev_page(&self) -> Option<usize> {
        self.has_prev().then(|| self.page_number - 1)
    }

    pub fn next_page(&self) -> Option<usize> {
        self.has_next().then(|| self.page_number + 1)
    }
}

/// Split `items` into pages of `page_size`.
///
/// An empty listing still yields a single empty page so the listing URL
/// always resolves.
pub fn paginate<T: Clone>(items: &[T], page_size: usize) -> Result<Vec<PaginatedView<T>>> {
    if page_size == 0 {
        return Err(CoreError::invalid_configuration("paginate", page_size));
    }

    let total_pages = items.len().div_ceil(page_size).max(1);
    if items.is_empty() {
        return Ok(vec![PaginatedView {
            page_number: 1,
            total_pages,
            items: Vec::new(),
        }]);
    }

    Ok(items
        .chunks(page_size)
        .enumerate()
        .map(|(index, chunk)| PaginatedView {
            page_number: index + 1,
            total_pages,
            items: chunk.to_vec(),
        })
        .collect())
}

/// A page of a [`Listing`] with its resolved URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingPage {
    pub url: String,

    #[serde(flatten)]
    pub view: PaginatedView<String>,
}

/// A paginated listing of entry paths rooted at a base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Base URL of the listing (`/`, `/tags/swift/`).
    pub url: String,

    pub pages: Vec<ListingPage>,
}

impl Listing {
    /// Paginate entry paths under `url`.
    pub fn new(url: impl Into<String>, paths: &[String], page_size: usize) -> Result<Self> {
        let url = url.into();
        let pages = paginate(paths, page_size)?
            .into_iter()
            .map(|view| ListingPage {
                url: page_url(&url, view.page_number),
                view,
            })
            .collect();
        Ok(Self { url, pages })
    }

    /// URL of page `n` of this listing.
    pub fn page_url(&self, n: usize) -> String {
        page_url(&self.url, n)
    }

    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }
}

/// URL of page `n` of the listing at `base`.
pub fn page_url(base: &str, n: usize) -> String {
    let base = base.trim_end_matches('/');
    if n <= 1 {
        format!("{base}/")
    } else {
        format!("{base}/page/{n}/")
    }
}
