//! Taxonomy indexing.
//!
//! Buckets entries by tag and by category. Buckets hold entry paths and are
//! ordered by date (newest first), ties broken by path.

use std::collections::{BTreeMap, BTreeSet};

use quire_core::ContentEntry;
use serde::{Deserialize, Serialize};

use crate::collector::compare_by_date;

/// Term → ordered entry paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagIndex {
    buckets: BTreeMap<String, Vec<String>>,
}

impl TagIndex {
    /// Index `entries` by the terms `terms` selects from each one.
    ///
    /// A term repeated on one entry contributes that entry only once.
    pub fn build<F>(entries: &[ContentEntry], terms: F) -> Self
    where
        F: Fn(&ContentEntry) -> &[String],
    {
        let mut grouped: BTreeMap<&str, Vec<&ContentEntry>> = BTreeMap::new();
        for entry in entries {
            let unique: BTreeSet<&str> = terms(entry).iter().map(String::as_str).collect();
            for term in unique {
                grouped.entry(term).or_default().push(entry);
            }
        }

        let buckets = grouped
            .into_iter()
            .map(|(term, mut members)| {
                members.sort_by(|a, b| compare_by_date(a, b));
                (
                    term.to_string(),
                    members.into_iter().map(|e| e.path.clone()).collect(),
                )
            })
            .collect();

        Self { buckets }
    }

    /// Entry paths for a term, empty if the term is unknown.
    pub fn get(&self, term: &str) -> &[String] {
        self.buckets.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All terms in lexical order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.buckets
            .iter()
            .map(|(term, paths)| (term.as_str(), paths.as_slice()))
    }

    pub fn contains(&self, term: &str) -> bool {
        self.buckets.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Index of taxonomy terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyIndex {
    /// Tag -> entry paths.
    pub tags: TagIndex,

    /// Category -> entry paths.
    pub categories: TagIndex,
}

impl TaxonomyIndex {
    pub fn build(entries: &[ContentEntry]) -> Self {
        Self {
            tags: TagIndex::build(entries, |e| &e.tags),
            categories: TagIndex::build(entries, |e| &e.categories),
        }
    }
}

/// URL-safe form of a taxonomy term (`Swift UI` → `swift-ui`).
pub fn term_slug(term: &str) -> String {
    term.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn entry(path: &str, date: Option<&str>, tags: &[&str]) -> ContentEntry {
        let date_line = date.map(|d| format!("date: {d}\n")).unwrap_or_default();
        let raw = format!(
            "---\ntitle: {path}\nkind: {}\n{date_line}tags: [{}]\n---\n",
            if date.is_some() { "post" } else { "page" },
            tags.join(", ")
        );
        ContentEntry::parse(Path::new(path), &raw, &[]).expect("entry")
    }

    #[test]
    fn test_bucket_membership() {
        let entries = vec![
            entry("post/a.md", Some("2018-01-02"), &["swift", "ios"]),
            entry("post/b.md", Some("2018-03-24"), &["swift"]),
            entry("post/c.md", Some("2018-04-02"), &[]),
        ];

        let index = TagIndex::build(&entries, |e| &e.tags);

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("swift"), &["post/b.md", "post/a.md"]);
        assert_eq!(index.get("ios"), &["post/a.md"]);
        assert!(index.get("rust").is_empty());

        // every entry is in exactly the buckets of its tags
        for e in &entries {
            for (term, paths) in index.iter() {
                let member = paths.contains(&e.path);
                assert_eq!(member, e.tags.iter().any(|t| t == term), "{} / {term}", e.path);
            }
        }
    }

    #[test]
    fn test_architecture_bucket_most_recent_first() {
        let entries = vec![
            entry("post/mvvm.md", Some("2018-01-02"), &["architecture"]),
            entry("post/redux.md", Some("2019-05-10"), &["architecture"]),
            entry("post/other.md", Some("2020-01-01"), &["swift"]),
        ];

        let index = TaxonomyIndex::build(&entries);
        assert_eq!(
            index.tags.get("architecture"),
            &["post/redux.md", "post/mvvm.md"]
        );
    }

    #[test]
    fn test_duplicate_tags_collapse() {
        let entries = vec![entry("post/a.md", Some("2018-01-02"), &["swift", "swift"])];
        let index = TagIndex::build(&entries, |e| &e.tags);
        assert_eq!(index.get("swift"), &["post/a.md"]);
    }

    #[test]
    fn test_ties_and_undated_order() {
        let entries = vec![
            entry("post/b.md", Some("2018-01-02"), &["t"]),
            entry("post/a.md", Some("2018-01-02"), &["t"]),
            entry("me.md", None, &["t"]),
        ];
        let index = TagIndex::build(&entries, |e| &e.tags);
        assert_eq!(index.get("t"), &["post/a.md", "post/b.md", "me.md"]);
    }

    #[test]
    fn test_index_is_input_order_independent() {
        let mut entries = vec![
            entry("post/a.md", Some("2018-01-02"), &["x", "y"]),
            entry("post/b.md", Some("2018-03-24"), &["y"]),
            entry("post/c.md", Some("2018-04-02"), &["x"]),
        ];
        let forward = TaxonomyIndex::build(&entries);
        entries.reverse();
        assert_eq!(TaxonomyIndex::build(&entries), forward);
    }

    #[test]
    fn test_term_slug() {
        assert_eq!(term_slug("Swift UI"), "swift-ui");
        assert_eq!(term_slug("  RxSwift "), "rxswift");
    }
}
