//! New command - create new content with front matter

use std::{fs, path::Path, path::PathBuf};

use chrono::Utc;
use color_eyre::eyre::{Result, WrapErr, bail};

use super::{load_config, resolve_dir, site_root};

/// Kind of entry to scaffold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ContentKind {
    /// Dated article listed on the home page
    Post,
    /// Standalone page added to the main menu
    Page,
}

/// Run the new command.
///
/// Creates a new Markdown file under the configured content directory,
/// honouring `QUIRE__` overrides like the other commands. The configuration
/// file is optional here; without it `content/` next to it is used.
pub fn run(config_path: &Path, path: &Path, kind: ContentKind) -> Result<PathBuf> {
    tracing::info!(?path, ?kind, "Creating new content");

    let root = site_root(config_path);
    let content_dir = match load_config(config_path) {
        Ok(config) => resolve_dir(&root, &config.build.content_dir),
        Err(e) => {
            tracing::debug!(error = %e, "no usable configuration, using content/");
            root.join("content")
        }
    };

    let full_path = content_dir.join(path);
    let file_path = if full_path.extension().is_some() {
        full_path
    } else {
        full_path.with_extension("md")
    };

    if file_path.exists() {
        bail!("Refusing to overwrite {}", file_path.display());
    }

    // Create parent directories
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).wrap_err("Failed to create directories")?;
    }

    let frontmatter = match kind {
        ContentKind::Post => generate_post_frontmatter(path),
        ContentKind::Page => generate_page_frontmatter(path),
    };
    fs::write(&file_path, frontmatter).wrap_err("Failed to write file")?;

    tracing::info!(?file_path, "Created new content file");
    println!("Created: {}", file_path.display());

    Ok(file_path)
}

fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Untitled")
        .replace(['-', '_'], " ")
}

fn generate_post_frontmatter(path: &Path) -> String {
    let title = title_from_path(path);
    let date = Utc::now().format("%Y-%m-%d").to_string();

    format!(
        r#"---
title: "{title}"
date: {date}
description: ""
draft: true
tags: []
---

Write your content here.
"#
    )
}

fn generate_page_frontmatter(path: &Path) -> String {
    let title = title_from_path(path);

    format!(
        r#"---
title: "{title}"
kind: page
description: ""
menu:
  main:
    weight: 10
---

Write your content here.
"#
    )
}
