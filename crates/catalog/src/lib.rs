//! # Crag Catalog
//!
//! The headland → sector → route tree, its comment pool, and the two ways
//! data gets into it.
//!
//! ## Data flow
//!
//! ```text
//! seed.json ──> import_seed (lenient, reports issues) ──┐
//!                                                       ├──> Catalog ──> save/load (JSON)
//! admin edits (strict, typed errors) ───────────────────┘        │
//!                                                                └──> sector_summaries
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use crag_catalog::{import_seed, Catalog};
//!
//! fn main() -> crag_catalog::Result<()> {
//!     let seed = std::fs::read_to_string("routes.json")?;
//!     let report = import_seed(&seed)?;
//!     for issue in &report.issues {
//!         eprintln!("skipped {} {}: {}", issue.kind, issue.slug, issue.message);
//!     }
//!     report.catalog.save("catalog.json".as_ref())?;
//!
//!     let catalog = Catalog::load("catalog.json".as_ref())?;
//!     println!("{} sectors", catalog.sector_summaries(None).len());
//!     Ok(())
//! }
//! ```

mod admin;
mod catalog;
mod error;
mod import;
mod model;
mod summary;
mod validate;

#[cfg(test)]
mod test_support;

pub use admin::{HeadlandDraft, RoutePatch, SectorDraft};
pub use catalog::{
    Catalog, CatalogCounts, CommentPool, HeadlandNav, RouteRef, SectorNav, SectorRef,
};
pub use error::{CatalogError, EntityKind, Result};
pub use import::{import_seed, ImportIssue, ImportReport, ImportStats};
pub use model::{
    grade_from_value, parse_grade, Comment, CommentTag, Headland, Route, RouteStyle, Sector,
};
pub use summary::SectorSummary;
pub use validate::{slugify, validate_name, validate_slug, validate_stars};
