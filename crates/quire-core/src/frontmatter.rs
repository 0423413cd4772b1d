//! Frontmatter parsing for content files.
//!
//! Both YAML (`---`) and TOML (`+++`) blocks are accepted. TOML blocks are
//! converted into a YAML value first so a single schema ([`Frontmatter`])
//! describes both formats.

use std::{collections::BTreeMap, path::Path};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CoreError, Result};

/// Frontmatter metadata for content files.
///
/// Required fields are modelled as `Option` here; presence is enforced when
/// the frontmatter is turned into a [`crate::ContentEntry`], so missing
/// fields are reported against the file they came from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Page title (required).
    #[serde(default)]
    pub title: Option<String>,

    /// Publication date (required for posts).
    #[serde(default, deserialize_with = "deserialize_date")]
    pub date: Option<DateTime<Utc>>,

    /// Short summary for listings and meta tags.
    #[serde(default)]
    pub description: Option<String>,

    /// Tags, either a list or a comma-separated string.
    #[serde(default, deserialize_with = "deserialize_terms")]
    pub tags: Vec<String>,

    /// Categories, same shape as tags.
    #[serde(default, deserialize_with = "deserialize_terms")]
    pub categories: Vec<String>,

    /// Cover image path relative to the static root.
    #[serde(default)]
    pub image: Option<String>,

    /// Routing override for the output URL.
    #[serde(default)]
    pub url: Option<String>,

    /// Replacement for the last segment of the derived URL.
    #[serde(default)]
    pub slug: Option<String>,

    /// Whether this is a draft.
    #[serde(default)]
    pub draft: bool,

    /// Explicit entry kind, overriding section-based detection.
    #[serde(default)]
    pub kind: Option<DeclaredKind>,

    /// Menu declaration for pages.
    #[serde(default)]
    pub menu: Option<MenuField>,

    /// Custom extra fields, passed through untouched.
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Entry kind declared in frontmatter via `kind: post|page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclaredKind {
    Post,
    Page,
}

/// The shapes a `menu` key may take.
///
/// ```yaml
/// menu: main
/// menu: [main, footer]
/// menu:
///   main:
///     name: Projects
///     weight: 2
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MenuField {
    Name(String),
    Names(Vec<String>),
    Table(BTreeMap<String, Option<MenuSettings>>),
}

/// Per-menu settings on a page; unset fields fall back to page values.
///
/// Other Hugo keys (`parent`, `pre`, `post`) are accepted and ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuSettings {
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub weight: Option<i64>,
}

impl MenuField {
    /// Flatten into `(namespace, settings)` pairs, ordered by namespace.
    pub fn namespaces(&self) -> Vec<(String, MenuSettings)> {
        let mut out: Vec<(String, MenuSettings)> = match self {
            Self::Name(name) => vec![(name.clone(), MenuSettings::default())],
            Self::Names(names) => names
                .iter()
                .map(|n| (n.clone(), MenuSettings::default()))
                .collect(),
            Self::Table(table) => table
                .iter()
                .map(|(n, s)| (n.clone(), s.clone().unwrap_or_default()))
                .collect(),
        };
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out.dedup_by(|a, b| a.0 == b.0);
        out
    }
}

/// Delimiter types for frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML frontmatter delimited by `---`.
    Yaml,
    /// TOML frontmatter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split content into frontmatter and body.
///
/// The opening delimiter must be the first non-blank text and the closing
/// delimiter must start a line.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.trim_start_matches('\u{feff}').trim_start();

    let format = if content.starts_with("---") {
        FrontmatterFormat::Yaml
    } else if content.starts_with("+++") {
        FrontmatterFormat::Toml
    } else {
        return None;
    };

    let delimiter = format.delimiter();
    let after_first = &content[delimiter.len()..];
    let after_first = after_first
        .strip_prefix("\r\n")
        .or_else(|| after_first.strip_prefix('\n'))?;

    let (fm_end, body_start) = if after_first.starts_with(delimiter) {
        (0, delimiter.len())
    } else {
        let needle = format!("\n{delimiter}");
        let pos = after_first.find(&needle)?;
        (pos, pos + needle.len())
    };

    let frontmatter = after_first[..fm_end].trim();
    let rest = &after_first[body_start..];
    // Whatever trails the closing delimiter on its line is discarded.
    let body = match rest.find('\n') {
        Some(nl) => &rest[nl + 1..],
        None => "",
    };

    Some((format, frontmatter, body.trim_start_matches(['\r', '\n'])))
}

/// Parse frontmatter from a content file.
///
/// A file without a frontmatter block is a malformed entry.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<(Frontmatter, String)> {
    let Some((format, fm_str, body)) = split_frontmatter(content) else {
        return Err(CoreError::malformed(path, "front matter"));
    };

    let value: serde_yaml::Value = match format {
        FrontmatterFormat::Yaml if fm_str.is_empty() => {
            serde_yaml::Value::Mapping(serde_yaml::Mapping::new())
        }
        FrontmatterFormat::Yaml => {
            serde_yaml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
        }
        FrontmatterFormat::Toml => {
            let table: toml::Table =
                toml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?;
            toml_to_yaml(toml::Value::Table(table))
        }
    };

    let frontmatter: Frontmatter =
        serde_yaml::from_value(value).map_err(|e| CoreError::frontmatter(path, e.to_string()))?;

    Ok((frontmatter, body.to_string()))
}

/// Convert a TOML value to the equivalent YAML value.
///
/// TOML datetimes become strings in their RFC 3339 form.
fn toml_to_yaml(value: toml::Value) -> serde_yaml::Value {
    use serde_yaml::Value as Y;

    match value {
        toml::Value::String(s) => Y::String(s),
        toml::Value::Integer(i) => Y::Number(i.into()),
        toml::Value::Float(f) => Y::Number(f.into()),
        toml::Value::Boolean(b) => Y::Bool(b),
        toml::Value::Datetime(dt) => Y::String(dt.to_string()),
        toml::Value::Array(items) => Y::Sequence(items.into_iter().map(toml_to_yaml).collect()),
        toml::Value::Table(table) => Y::Mapping(
            table
                .into_iter()
                .map(|(k, v)| (Y::String(k), toml_to_yaml(v)))
                .collect(),
        ),
    }
}

/// Parse a frontmatter date.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and bare
/// `YYYY-MM-DD` (midnight UTC).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn deserialize_date<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_date(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date `{s}`"))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Terms {
    Line(String),
    List(Vec<String>),
}

fn deserialize_terms<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let terms: Option<Terms> = Option::deserialize(deserializer)?;
    let raw = match terms {
        None => Vec::new(),
        Some(Terms::Line(line)) => line.split(',').map(str::to_string).collect(),
        Some(Terms::List(list)) => list,
    };
    Ok(raw
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect())
}
