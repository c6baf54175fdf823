//! # Crag Insights
//!
//! Pure, stateless derivations used when rendering the route catalogue.
//!
//! ## Components
//!
//! - **Comment selector** - picks a reproducible subset of comments per route,
//!   seeded by the route slug
//! - **Grade histogram** - counts a sector's routes into four fixed grade bands
//! - **Style normalisation** - maps free-form route annotations onto
//!   `trad`/`sport`/`solo`
//! - **Difficulty consensus** - one vote per user, tallied with percentages
//! - **Tag tallies** - toggleable per-user tag votes
//!
//! ```text
//! comments[] + slug ──> slug_hash ──> seeded Fisher-Yates ──> sorted subset
//!
//! routes[] ──┬──> grade bands ──> [Easy, Medium, Hard, Very Hard]
//!            └──> info labels ──> lookup table ──> {trad, sport, solo}
//! ```
//!
//! Nothing here holds shared state; every call works on its own arguments, so
//! all functions are safe to call from any number of threads at once.

mod aggregate;
mod consensus;
mod grades;
mod selector;
mod style;
mod tags;

pub use aggregate::{aggregate, SectorAggregate};
pub use consensus::{ConsensusTally, DifficultyBallot, DifficultyVote, VoteCount};
pub use grades::{grade_histogram, GradeBand, GradeBucket, GradeHistogram};
pub use selector::{
    select_for_route, select_for_route_cloned, shuffled_indices, slug_hash, target_count,
    MAX_SELECTION, MIN_SELECTION,
};
pub use style::{canonicalize, clean_label, route_types, Discipline};
pub use tags::{tag_color, TagBallot, TagCount};

/// The two route attributes the aggregations look at.
pub trait RouteRecord {
    /// Integer difficulty grade, `None` when missing or unparseable.
    fn grade(&self) -> Option<i32>;

    /// Raw style annotation as found in the source data (e.g. `"(T)"`).
    fn style_label(&self) -> Option<&str>;
}

impl<R: RouteRecord + ?Sized> RouteRecord for &R {
    fn grade(&self) -> Option<i32> {
        (**self).grade()
    }

    fn style_label(&self) -> Option<&str> {
        (**self).style_label()
    }
}
