//! Content types and structures.

use std::path::{Component, Path};

use chrono::{DateTime, Utc};
use pulldown_cmark::{Event, Parser};
use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, Result},
    frontmatter::{DeclaredKind, Frontmatter, parse_frontmatter},
    menu::{MenuDeclaration, MenuEntry},
};

/// Words per minute used for reading time estimates.
const WORDS_PER_MINUTE: u32 = 200;

/// Maximum summary length in characters when no description is given.
const SUMMARY_CHARS: usize = 160;

/// File extensions recognised as content.
const CONTENT_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Whether a path has a content file extension.
pub fn is_content_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            CONTENT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Parsed content path with section and URL extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPath {
    /// Source path relative to the content root, `/`-separated.
    pub path: String,

    /// First directory component, empty for root-level files.
    pub section: String,

    /// Path-derived identifier without extension (`post/hello`).
    pub canonical_id: String,
}

impl ContentPath {
    /// Parse a relative content path.
    ///
    /// Supports patterns like:
    /// - `post/hello.md` → section: "post", canonical_id: "post/hello"
    /// - `post/hello/index.md` → section: "post", canonical_id: "post/hello"
    /// - `projects.md` → section: "", canonical_id: "projects"
    /// - `index.md` → section: "", canonical_id: ""
    pub fn from_path(path: &Path) -> Option<Self> {
        if !is_content_file(path) {
            return None;
        }

        let mut parts = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_str()?.to_string()),
                Component::CurDir => {}
                _ => return None,
            }
        }

        let file_name = parts.pop()?;
        let stem = Path::new(&file_name).file_stem()?.to_str()?.to_string();

        let section = if parts.is_empty() {
            String::new()
        } else {
            parts[0].clone()
        };

        let mut id_parts = parts.clone();
        if stem != "index" && stem != "_index" {
            id_parts.push(stem);
        }

        parts.push(file_name);

        Some(Self {
            path: parts.join("/"),
            section,
            canonical_id: id_parts.join("/"),
        })
    }

    /// Get the URL path for this content, optionally replacing the last segment.
    pub fn url_path(&self, slug: Option<&str>) -> String {
        let mut segments: Vec<&str> = self
            .canonical_id
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        if let Some(slug) = slug.map(str::trim).filter(|s| !s.is_empty()) {
            segments.pop();
            segments.push(slug.trim_matches('/'));
        }

        normalize_url(&segments.join("/"))
    }
}

/// Normalise a site-relative URL to `/a/b/` form.
///
/// A leading slash is always added; a trailing slash is added unless the
/// last segment looks like a file (`/feed.xml`).
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
    if last.contains('.') {
        format!("/{trimmed}")
    } else {
        format!("/{trimmed}/")
    }
}

/// Kind of content entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntryKind {
    /// A dated article that participates in listings.
    Post,
    /// A standalone page, optionally contributing menu entries.
    Page {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        menus: Vec<MenuDeclaration>,
    },
}

impl EntryKind {
    pub fn is_post(&self) -> bool {
        matches!(self, Self::Post)
    }

    /// Menu declarations carried by this entry (always empty for posts).
    pub fn menus(&self) -> &[MenuDeclaration] {
        match self {
            Self::Post => &[],
            Self::Page { menus } => menus,
        }
    }
}

/// A fully loaded content entry.
///
/// Created once by the loader and never mutated afterwards; indexes refer
/// to entries by [`ContentEntry::path`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    /// Source path relative to the content root.
    pub path: String,

    /// Output URL.
    pub url: String,

    /// Section (first directory component).
    #[serde(default)]
    pub section: String,

    /// Display title.
    pub title: String,

    /// Publication date.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,

    /// Short summary; empty when not declared.
    #[serde(default)]
    pub description: String,

    /// Tags as declared (may contain duplicates).
    #[serde(default)]
    pub tags: Vec<String>,

    /// Categories as declared.
    #[serde(default)]
    pub categories: Vec<String>,

    /// Cover image path.
    #[serde(default)]
    pub image: Option<String>,

    /// Whether this is a draft.
    #[serde(default)]
    pub draft: bool,

    /// Summary/excerpt for listings.
    #[serde(default)]
    pub summary: String,

    /// Word count of the body.
    #[serde(default)]
    pub word_count: u32,

    /// Reading time in minutes.
    #[serde(default)]
    pub reading_time: u32,

    /// Raw Markdown body.
    pub body: String,

    /// Post or page, plus page menu declarations.
    #[serde(flatten)]
    pub kind: EntryKind,
}

impl ContentEntry {
    /// Parse a content file into an entry.
    ///
    /// `post_sections` lists the sections whose entries default to posts.
    pub fn parse(relative: &Path, raw: &str, post_sections: &[String]) -> Result<Self> {
        let content_path = ContentPath::from_path(relative)
            .ok_or_else(|| CoreError::frontmatter(relative, "not a content path"))?;
        let (fm, body) = parse_frontmatter(raw, relative)?;
        Self::from_frontmatter(fm, body, &content_path, post_sections)
    }

    /// Build an entry from parsed frontmatter, enforcing required fields.
    pub fn from_frontmatter(
        fm: Frontmatter,
        body: String,
        content_path: &ContentPath,
        post_sections: &[String],
    ) -> Result<Self> {
        let source = Path::new(&content_path.path);

        let title = fm
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CoreError::malformed(source, "title"))?
            .to_string();

        let is_post = match fm.kind {
            Some(DeclaredKind::Post) => true,
            Some(DeclaredKind::Page) => false,
            None => post_sections.iter().any(|s| *s == content_path.section),
        };

        if is_post && fm.date.is_none() {
            return Err(CoreError::malformed(source, "date"));
        }

        let url = match fm.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            Some(explicit) => normalize_url(explicit),
            None => content_path.url_path(fm.slug.as_deref()),
        };

        let kind = if is_post {
            if fm.menu.is_some() {
                tracing::warn!(path = %content_path.path, "menu declared on a post is ignored");
            }
            EntryKind::Post
        } else {
            let menus = fm
                .menu
                .as_ref()
                .map(|field| {
                    field
                        .namespaces()
                        .into_iter()
                        .map(|(menu, settings)| MenuDeclaration {
                            menu,
                            entry: MenuEntry {
                                identifier: settings
                                    .identifier
                                    .unwrap_or_else(|| default_menu_identifier(&url)),
                                name: settings.name.unwrap_or_else(|| title.clone()),
                                url: settings.url.unwrap_or_else(|| url.clone()),
                                weight: settings.weight.unwrap_or(0),
                            },
                        })
                        .collect()
                })
                .unwrap_or_default();
            EntryKind::Page { menus }
        };

        let description = fm.description.unwrap_or_default().trim().to_string();
        let text = plain_text(&body);
        let word_count = text.split_whitespace().count() as u32;
        let reading_time = (word_count / WORDS_PER_MINUTE).max(1);
        let summary = if description.is_empty() {
            truncate_at_word_boundary(&text, SUMMARY_CHARS)
        } else {
            description.clone()
        };

        Ok(Self {
            path: content_path.path.clone(),
            url,
            section: content_path.section.clone(),
            title,
            date: fm.date,
            description,
            tags: fm.tags,
            categories: fm.categories,
            image: fm.image.filter(|i| !i.trim().is_empty()),
            draft: fm.draft,
            summary,
            word_count,
            reading_time,
            body,
            kind,
        })
    }

    pub fn is_post(&self) -> bool {
        self.kind.is_post()
    }
}

/// Default identifier for a page-declared menu entry: the last URL segment.
fn default_menu_identifier(url: &str) -> String {
    url.trim_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("home")
        .to_string()
}

/// Render Markdown to whitespace-normalised plain text.
fn plain_text(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    for event in Parser::new(markdown) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak | Event::End(_) => out.push(' '),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate text at word boundary, respecting UTF-8 character boundaries.
fn truncate_at_word_boundary(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        return text.to_string();
    }

    let truncate_byte_idx = text
        .char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());

    let truncated = &text[..truncate_byte_idx];

    if let Some(last_space_byte) = truncated.rfind(' ') {
        format!("{}...", &truncated[..last_space_byte])
    } else {
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> Vec<String> {
        vec!["post".to_string(), "posts".to_string()]
    }

    #[test]
    fn test_content_path_simple() {
        let cp = ContentPath::from_path(Path::new("post/hello.md")).expect("parse path");

        assert_eq!(cp.path, "post/hello.md");
        assert_eq!(cp.section, "post");
        assert_eq!(cp.canonical_id, "post/hello");
        assert_eq!(cp.url_path(None), "/post/hello/");
    }

    #[test]
    fn test_content_path_index_file() {
        let cp = ContentPath::from_path(Path::new("post/hello/index.md")).expect("parse path");
        assert_eq!(cp.canonical_id, "post/hello");
        assert_eq!(cp.url_path(None), "/post/hello/");

        let root = ContentPath::from_path(Path::new("_index.md")).expect("parse path");
        assert_eq!(root.section, "");
        assert_eq!(root.url_path(None), "/");
    }

    #[test]
    fn test_content_path_slug_override() {
        let cp = ContentPath::from_path(Path::new("post/2018-04-02-wrappers.md")).expect("parse");
        assert_eq!(cp.url_path(Some("property-wrappers")), "/post/property-wrappers/");
    }

    #[test]
    fn test_content_path_rejects_non_content() {
        assert!(ContentPath::from_path(Path::new("images/cover.png")).is_none());
        assert!(ContentPath::from_path(Path::new("../outside.md")).is_none());
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("projects"), "/projects/");
        assert_eq!(normalize_url("/me/"), "/me/");
        assert_eq!(normalize_url(""), "/");
        assert_eq!(normalize_url("/feed.xml"), "/feed.xml");
    }

    #[test]
    fn test_post_requires_date() {
        let raw = "---\ntitle: Undated\n---\nBody";
        let err = ContentEntry::parse(Path::new("post/undated.md"), raw, &sections()).unwrap_err();
        match err {
            CoreError::MalformedEntry { path, field } => {
                assert_eq!(path, Path::new("post/undated.md"));
                assert_eq!(field, "date");
            }
            other => panic!("expected MalformedEntry, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_title_is_malformed() {
        let raw = "---\ndate: 2018-01-02\ntitle: \"  \"\n---\nBody";
        let err = ContentEntry::parse(Path::new("post/blank.md"), raw, &sections()).unwrap_err();
        assert!(matches!(err, CoreError::MalformedEntry { ref field, .. } if field == "title"));
    }

    #[test]
    fn test_page_without_date_is_fine() {
        let raw = "---\ntitle: Me\n---\nAbout the author.";
        let entry = ContentEntry::parse(Path::new("me.md"), raw, &sections()).expect("entry");
        assert!(!entry.is_post());
        assert!(entry.date.is_none());
        assert_eq!(entry.url, "/me/");
        assert!(entry.kind.menus().is_empty());
    }

    #[test]
    fn test_declared_kind_overrides_section() {
        let raw = "---\ntitle: Archive\nkind: page\n---\n";
        let entry = ContentEntry::parse(Path::new("post/archive.md"), raw, &sections()).expect("entry");
        assert!(!entry.is_post());

        let raw = "---\ntitle: Note\nkind: post\ndate: 2020-05-01\n---\n";
        let entry = ContentEntry::parse(Path::new("notes/one.md"), raw, &sections()).expect("entry");
        assert!(entry.is_post());
    }

    #[test]
    fn test_page_menu_defaults() {
        let raw = "---\ntitle: Projects\nmenu:\n  main:\n    weight: 2\n---\n";
        let entry = ContentEntry::parse(Path::new("projects.md"), raw, &sections()).expect("entry");
        let menus = entry.kind.menus();
        assert_eq!(menus.len(), 1);
        assert_eq!(menus[0].menu, "main");
        assert_eq!(
            menus[0].entry,
            MenuEntry {
                identifier: "projects".to_string(),
                name: "Projects".to_string(),
                url: "/projects/".to_string(),
                weight: 2,
            }
        );
    }

    #[test]
    fn test_url_override() {
        let raw = "---\ntitle: Me\nurl: about-me\nmenu: main\n---\n";
        let entry = ContentEntry::parse(Path::new("me.md"), raw, &sections()).expect("entry");
        assert_eq!(entry.url, "/about-me/");
        assert_eq!(entry.kind.menus()[0].entry.url, "/about-me/");
        assert_eq!(entry.kind.menus()[0].entry.identifier, "about-me");
    }

    #[test]
    fn test_summary_and_reading_time() {
        let raw = "---\ntitle: Combine\ndate: 2019-06-10\n---\n# Heading\n\nSome *emphasised* text with `code`.";
        let entry = ContentEntry::parse(Path::new("post/combine.md"), raw, &sections()).expect("entry");
        assert_eq!(entry.summary, "Heading Some emphasised text with code.");
        assert_eq!(entry.word_count, 6);
        assert_eq!(entry.reading_time, 1);

        let raw = "---\ntitle: Combine\ndate: 2019-06-10\ndescription: Reactive streams\n---\nLong body";
        let entry = ContentEntry::parse(Path::new("post/combine.md"), raw, &sections()).expect("entry");
        assert_eq!(entry.summary, "Reactive streams");
    }

    #[test]
    fn test_entry_serializes_kind_tag() {
        let raw = "---\ntitle: Hello\ndate: 2018-01-02\n---\nHi";
        let entry = ContentEntry::parse(Path::new("post/hello.md"), raw, &sections()).expect("entry");
        let json = serde_json::to_value(&entry).expect("json");
        assert_eq!(json["kind"], "post");
        assert_eq!(json["url"], "/post/hello/");

        let back: ContentEntry = serde_json::from_value(json).expect("round trip");
        assert_eq!(back, entry);
    }

    #[test]
    fn test_truncate_at_word_boundary() {
        let text = "Hello world this is a test";
        assert_eq!(truncate_at_word_boundary(text, 100), text);
        assert_eq!(truncate_at_word_boundary(text, 11), "Hello...");
        assert_eq!(truncate_at_word_boundary(text, 12), "Hello world...");

        let chinese_text = "你好世界 Hello World";
        assert_eq!(truncate_at_word_boundary(chinese_text, 7), "你好世界...");
    }
}
