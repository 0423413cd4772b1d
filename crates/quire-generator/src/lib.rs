//! quire generator library
//!
//! Site assembly engine for quire.
//!
//! # Modules
//!
//! - [`collector`] - Content loading and validation
//! - [`taxonomy`] - Tag and category indexes
//! - [`menu`] - Navigation menu assembly
//! - [`paginate`] - Listing pagination
//! - [`build`] - Build orchestration and the site model

pub mod build;
pub mod collector;
pub mod menu;
pub mod paginate;
pub mod taxonomy;

pub use build::{BuildError, BuildStats, Builder, SiteModel, write_site_json};
pub use collector::{CollectorError, ContentCollector};
pub use menu::{MenuError, Menus};
pub use paginate::{Listing, PaginatedView, paginate};
pub use taxonomy::{TagIndex, TaxonomyIndex};
