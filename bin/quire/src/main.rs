//! quire CLI
//!
//! Assembles a Markdown blog into a site model for a theme renderer.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use quire::cmd::new::ContentKind;

/// Command-line interface for quire.
#[derive(Parser)]
#[command(
    name = "quire",
    version,
    about = "Assemble a Markdown blog into a site model"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Assemble the site and write site.json
    Build {
        /// Output directory (defaults to build.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Include draft entries
        #[arg(long)]
        drafts: bool,
        /// Override baseURL (e.g., https://example.com/)
        #[arg(long)]
        base_url: Option<String>,
        /// Content directory (defaults to build.content_dir)
        #[arg(long)]
        content: Option<PathBuf>,
    },
    /// Create a new content file with front matter
    New {
        /// Path for the new content, relative to the content directory (e.g., post/my-article)
        path: PathBuf,
        /// Kind of entry to scaffold
        #[arg(short, long, value_enum, default_value_t = ContentKind::Post)]
        kind: ContentKind,
    },
    /// Validate configuration and content without writing output
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    quire::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            output,
            drafts,
            base_url,
            content,
        } => {
            quire::cmd::build::run(
                &cli.config,
                &quire::cmd::build::Overrides {
                    output,
                    drafts,
                    base_url,
                    content,
                },
            )?;
        }
        Commands::New { path, kind } => {
            quire::cmd::new::run(&cli.config, &path, kind)?;
        }
        Commands::Check { strict } => {
            quire::cmd::check::run(&cli.config, strict)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_build_command_parsing() {
        let args = ["quire", "build", "--output", "dist"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.config, PathBuf::from("config.toml"));
        assert_eq!(cli.verbose, 0);

        match cli.command {
            Commands::Build {
                output,
                drafts,
                base_url,
                content,
            } => {
                assert_eq!(output, Some(PathBuf::from("dist")));
                assert!(!drafts);
                assert!(base_url.is_none());
                assert!(content.is_none());
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_build_with_drafts() {
        let args = ["quire", "build", "--drafts"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Build { drafts, output, .. } => {
                assert!(drafts);
                assert!(output.is_none());
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_build_with_overrides() {
        let args = [
            "quire",
            "build",
            "--base-url",
            "https://example.com/",
            "--content",
            "site/content",
        ];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Build {
                base_url, content, ..
            } => {
                assert_eq!(base_url.as_deref(), Some("https://example.com/"));
                assert_eq!(content, Some(PathBuf::from("site/content")));
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_new_command_parsing() {
        let args = ["quire", "new", "projects", "--kind", "page"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::New { path, kind } => {
                assert_eq!(path, PathBuf::from("projects"));
                assert_eq!(kind, ContentKind::Page);
            }
            _ => panic!("Expected New command"),
        }
    }

    #[test]
    fn test_cli_new_defaults_to_post() {
        let cli = Cli::parse_from(["quire", "new", "post/hello"]);
        match cli.command {
            Commands::New { kind, .. } => assert_eq!(kind, ContentKind::Post),
            _ => panic!("Expected New command"),
        }
    }

    #[test]
    fn test_cli_check_command_parsing() {
        let args = ["quire", "check", "--strict"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Check { strict } => {
                assert!(strict);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_verbosity_flags() {
        let args = ["quire", "-vvv", "build"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_cli_custom_config_path() {
        let args = ["quire", "--config", "site.toml", "build"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.config, PathBuf::from("site.toml"));
    }
}
