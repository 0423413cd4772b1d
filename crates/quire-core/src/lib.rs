//! quire core library
//!
//! Content model, frontmatter parsing, configuration and error handling for
//! the quire publishing pipeline.

pub mod config;
pub mod content;
pub mod error;
pub mod frontmatter;
pub mod menu;

pub use self::config::Config;
pub use content::{ContentEntry, ContentPath, EntryKind};
pub use error::{CoreError, Result};
pub use frontmatter::Frontmatter;
pub use menu::{MAIN_MENU, MenuDeclaration, MenuEntry};
