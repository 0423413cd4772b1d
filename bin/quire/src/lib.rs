//! quire CLI Library
//!
//! Command implementations for the quire binary, exposed as a library so
//! they can be tested and reused.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, check, new)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use quire::cmd;
//!
//! // Assemble the site and write public/site.json
//! cmd::build::run(Path::new("config.toml"), &cmd::build::Overrides::default()).unwrap();
//! ```

pub mod cmd;

// Re-export core types for convenience
pub use quire_core::{Config, ContentEntry};
pub use quire_generator::{BuildStats, Builder, SiteModel};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
