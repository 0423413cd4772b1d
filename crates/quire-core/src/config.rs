//! Site configuration management.
//!
//! The configuration file follows Hugo's `config.toml` layout. Only the keys
//! the publishing core needs are typed; everything else is kept in
//! [`Config::params`] and [`Config::extra`] and passed through to the
//! renderer untouched.

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, Result},
    menu::MenuEntry,
};

/// Main configuration structure for quire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL for the site (e.g., "https://example.com/").
    #[serde(rename = "baseURL", alias = "baseurl", alias = "base_url")]
    pub base_url: String,

    /// Site title.
    pub title: String,

    /// Theme selector, passed through to the renderer.
    #[serde(default)]
    pub theme: Option<String>,

    /// Entries per listing page.
    #[serde(default = "default_paginate")]
    pub paginate: i64,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Content layout settings.
    #[serde(default)]
    pub content: ContentConfig,

    /// Menu namespace → declared entries (`[[menu.main]]`).
    #[serde(default)]
    pub menu: BTreeMap<String, Vec<ConfigMenuEntry>>,

    /// Theme parameters, opaque to the core.
    #[serde(default)]
    pub params: toml::Table,

    /// Any other top-level keys, opaque to the core.
    #[serde(default, flatten)]
    pub extra: toml::Table,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Whether to include drafts.
    #[serde(default)]
    pub drafts: bool,

    /// Content directory, relative to the working directory.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Output directory for the assembled site model.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

/// Content layout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Sections whose entries are posts unless they declare `kind: page`.
    #[serde(default = "default_post_sections")]
    pub post_sections: Vec<String>,
}

/// A `[[menu.<name>]]` table from the configuration file.
///
/// `identifier` falls back to `name`, as Hugo does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigMenuEntry {
    #[serde(default)]
    pub identifier: Option<String>,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub weight: i64,
}

impl ConfigMenuEntry {
    /// Resolve into a [`MenuEntry`].
    pub fn to_entry(&self) -> MenuEntry {
        MenuEntry {
            identifier: self
                .identifier
                .clone()
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| self.name.clone()),
            name: self.name.clone(),
            url: self.url.clone(),
            weight: self.weight,
        }
    }
}

// Default value functions
fn default_paginate() -> i64 {
    10
}

fn default_content_dir() -> String {
    "content".to_string()
}

fn default_output_dir() -> String {
    "public".to_string()
}

fn default_post_sections() -> Vec<String> {
    vec!["post".to_string(), "posts".to_string()]
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            drafts: false,
            content_dir: default_content_dir(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            post_sections: default_post_sections(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `QUIRE__*` environment overrides layered on top.
    ///
    /// `QUIRE__PAGINATE=5` overrides `paginate`, `QUIRE__BUILD__DRAFTS=true`
    /// overrides `build.drafts`.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix("QUIRE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(CoreError::config("title cannot be empty"));
        }

        if self.base_url.trim().is_empty() {
            return Err(CoreError::config("baseURL cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            tracing::warn!(base_url = %self.base_url, "baseURL should start with http:// or https://");
        }

        if self.paginate < 1 {
            return Err(CoreError::invalid_configuration("paginate", self.paginate));
        }

        for (menu, entries) in &self.menu {
            for entry in entries {
                if entry.name.trim().is_empty() {
                    return Err(CoreError::invalid_configuration(
                        format!("menu.{menu}.name"),
                        "\"\"",
                    ));
                }
            }
        }

        Ok(())
    }

    /// Validated page size for listings.
    pub fn page_size(&self) -> Result<usize> {
        usize::try_from(self.paginate)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| CoreError::invalid_configuration("paginate", self.paginate))
    }

    /// Menu entries declared in configuration, as `(namespace, entry)` pairs.
    pub fn menu_entries(&self) -> Vec<(String, MenuEntry)> {
        self.menu
            .iter()
            .flat_map(|(menu, entries)| entries.iter().map(|e| (menu.clone(), e.to_entry())))
            .collect()
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn create_test_config() -> String {
        r#"
baseURL = "https://blog.example.com/"
languageCode = "en-us"
title = "Notes on Swift"
theme = "hugo-theme-cleanwhite"
paginate = 3

[params]
subtitle = "Swift, iOS and architecture"
show_reading_time = true

[build]
drafts = true
output_dir = "dist"

[content]
post_sections = ["post"]

[[menu.main]]
identifier = "home"
name = "Home"
url = "/"
weight = 1

[[menu.main]]
name = "Archive"
url = "/archive/"
weight = 4
"#
        .to_string()
    }

    fn write_config(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&config_path).expect("create file");
        file.write_all(content.as_bytes()).expect("write");
        (dir, config_path)
    }

    #[test]
    fn test_load_config() {
        let (_dir, config_path) = write_config(&create_test_config());

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.title, "Notes on Swift");
        assert_eq!(config.base_url, "https://blog.example.com/");
        assert_eq!(config.theme.as_deref(), Some("hugo-theme-cleanwhite"));
        assert_eq!(config.paginate, 3);
        assert_eq!(config.page_size().expect("page size"), 3);
        assert!(config.build.drafts);
        assert_eq!(config.build.output_dir, "dist");
        assert_eq!(config.build.content_dir, "content");
        assert_eq!(config.content.post_sections, vec!["post"]);
        assert_eq!(
            config.params.get("subtitle").and_then(|v| v.as_str()),
            Some("Swift, iOS and architecture")
        );
        assert_eq!(
            config.extra.get("languageCode").and_then(|v| v.as_str()),
            Some("en-us")
        );
    }

    #[test]
    fn test_menu_entries() {
        let (_dir, config_path) = write_config(&create_test_config());
        let config = Config::load(&config_path).expect("load config");

        let entries = config.menu_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "main");
        assert_eq!(entries[0].1.identifier, "home");
        assert_eq!(entries[0].1.weight, 1);
        // identifier falls back to the name
        assert_eq!(entries[1].1.identifier, "Archive");
    }

    #[test]
    fn test_config_defaults() {
        let (_dir, config_path) = write_config(
            r#"
baseURL = "https://example.com"
title = "Minimal Site"
"#,
        );

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.paginate, 10);
        assert!(!config.build.drafts);
        assert_eq!(config.build.output_dir, "public");
        assert_eq!(config.content.post_sections, vec!["post", "posts"]);
        assert!(config.menu.is_empty());
        assert!(config.theme.is_none());
    }

    #[test]
    fn test_non_positive_paginate_rejected() {
        for value in ["0", "-2"] {
            let (_dir, config_path) = write_config(&format!(
                "baseURL = \"https://example.com\"\ntitle = \"T\"\npaginate = {value}\n"
            ));
            let err = Config::load(&config_path).unwrap_err();
            match err {
                CoreError::InvalidConfiguration { field, value: got } => {
                    assert_eq!(field, "paginate");
                    assert_eq!(got, value);
                }
                other => panic!("expected InvalidConfiguration, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_url_for() {
        let (_dir, config_path) = write_config(
            r#"
baseURL = "https://example.com/"
title = "Test"
"#,
        );

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(
            config.url_for("/post/hello/"),
            "https://example.com/post/hello/"
        );
        assert_eq!(config.url_for("me/"), "https://example.com/me/");
    }

    #[test]
    fn test_load_with_env_reads_file() {
        let (_dir, config_path) = write_config(&create_test_config());

        let config = Config::load_with_env(&config_path).expect("load config");
        assert_eq!(config.title, "Notes on Swift");
        assert_eq!(config.paginate, 3);
        assert_eq!(config.menu_entries().len(), 2);
    }

    #[test]
    fn test_config_validation_empty_title() {
        let (_dir, config_path) = write_config(
            r#"
baseURL = "https://example.com"
title = ""
"#,
        );

        let result = Config::load(&config_path);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("title cannot be empty")
        );
    }

    #[test]
    fn test_config_not_found() {
        let result = Config::load(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }
}
