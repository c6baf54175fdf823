//! # Crag Search
//!
//! Two ways to find things in the catalogue:
//!
//! - [`search`]: exact, case-insensitive substring match on sector and route
//!   names, grouped into sector and route hits in catalogue order
//! - [`FuzzySearch`]: nucleo-ranked route matches over name, sector and
//!   description, normalised against the best hit

mod error;
mod fuzzy;
mod substring;

#[cfg(test)]
mod test_support;

pub use error::{Result, SearchError};
pub use fuzzy::{FuzzyHit, FuzzySearch};
pub use substring::{search, RouteHit, SearchResults, SectorHit};
