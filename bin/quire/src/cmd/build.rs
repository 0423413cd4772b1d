//! Build command - assembles the site model and writes site.json

use std::{path::Path, path::PathBuf, time::Instant};

use color_eyre::eyre::{Result, WrapErr};
use quire_generator::{Builder, write_site_json};

use super::{load_config, resolve_dir, site_root};

/// Command-line overrides for the build command.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub output: Option<PathBuf>,
    pub drafts: bool,
    pub base_url: Option<String>,
    pub content: Option<PathBuf>,
}

/// Run the build command.
///
/// Assembles the whole site and writes it to `<output>/site.json`. Returns
/// the path written.
pub fn run(config_path: &Path, overrides: &Overrides) -> Result<PathBuf> {
    let start = Instant::now();
    tracing::info!(?config_path, ?overrides, "Starting build");

    let mut config = load_config(config_path)?;
    let root = site_root(config_path);

    // Include drafts if flag is set
    if overrides.drafts {
        config.build.drafts = true;
    }

    // Override baseURL if specified via CLI
    if let Some(base_url) = &overrides.base_url {
        tracing::info!(base_url = %base_url, "Overriding baseURL from CLI");
        config.base_url = base_url.clone();
        config.validate().wrap_err("Invalid --base-url")?;
    }

    let content_dir = match &overrides.content {
        Some(dir) => dir.clone(),
        None => resolve_dir(&root, &config.build.content_dir),
    };
    let output = match &overrides.output {
        Some(dir) => dir.clone(),
        None => resolve_dir(&root, &config.build.output_dir),
    };

    let model = Builder::new(config, &content_dir)
        .build()
        .wrap_err("Build failed")?;
    let written = write_site_json(&model, &output).wrap_err("Failed to write site model")?;

    let stats = model.stats();
    let duration = start.elapsed();

    // Print build statistics
    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Entries:    {} ({} posts, {} pages)", stats.entries, stats.posts, stats.pages);
    println!("  Tags:       {}", stats.tags);
    println!("  Categories: {}", stats.categories);
    println!("  Menu items: {}", stats.menu_items);
    println!("  Listings:   {} pages", stats.listing_pages);
    println!();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", written.display());
    println!();

    tracing::info!(
        ?stats,
        duration_ms = duration.as_millis() as u64,
        "Build completed successfully"
    );

    Ok(written)
}
