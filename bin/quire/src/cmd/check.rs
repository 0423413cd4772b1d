//! Check command - validate configuration and content

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, bail};
use quire_generator::{Builder, SiteModel};

use super::{load_config, resolve_dir, site_root};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Runs the whole pipeline without writing anything. Pipeline errors fail
/// the check; soft issues are reported as warnings, which fail it only in
/// strict mode.
pub fn run(config_path: &Path, strict: bool) -> Result<ValidationReport> {
    tracing::info!(?config_path, strict, "Checking configuration and content");

    println!("Checking configuration...");
    let config = load_config(config_path)?;
    println!("  ✓ Configuration valid");

    let root = site_root(config_path);
    let content_dir = resolve_dir(&root, &config.build.content_dir);
    if !content_dir.exists() {
        println!("  ⚠ {} does not exist", content_dir.display());
    }

    println!("\nChecking content...");
    let model = Builder::new(config, &content_dir)
        .build()
        .wrap_err("Content check failed")?;
    println!("  ✓ {} entries assembled", model.entries.len());

    let report = check_model(&model, &root.join("static"));

    // Print summary
    println!();
    println!("Summary:");
    println!("  Warnings: {}", report.warnings.len());

    if report.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &report.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if strict && report.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            report.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(report)
}

/// Collect soft issues in an assembled site.
pub fn check_model(model: &SiteModel, static_dir: &Path) -> ValidationReport {
    let mut report = ValidationReport::default();

    for entry in &model.entries {
        if entry.description.is_empty() {
            report.add_warning(format!("{}: missing description", entry.path));
        }

        if let Some(image) = &entry.image {
            if is_remote(image) {
                continue;
            }
            let local = static_dir.join(image.trim_start_matches('/'));
            if !local.is_file() {
                report.add_warning(format!(
                    "{}: cover image {image} not found in {}",
                    entry.path,
                    static_dir.display()
                ));
            }
        }
    }

    report
}

fn is_remote(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://") || url.starts_with("//")
}
