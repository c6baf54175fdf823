use anyhow::{Context as AnyhowContext, Result};
use crag_catalog::{Catalog, Comment, CommentPool, CommentTag, Route};
use crag_insights::{ConsensusTally, DifficultyBallot, DifficultyVote, TagBallot, TagCount};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::Settings;

/// Everything a command can read or change.
///
/// Votes and posted comments live only as long as the process; the catalogue
/// is saved to disk by admin edits.
#[derive(Debug, Default)]
pub struct AppState {
    pub catalog: Catalog,
    pub comments: CommentPool,
    difficulty: HashMap<String, DifficultyBallot>,
    tags: HashMap<String, TagBallot>,
    /// Newest first, per route slug.
    posted: HashMap<String, Vec<Comment>>,
}

impl AppState {
    pub fn new(catalog: Catalog, comments: CommentPool) -> Self {
        Self {
            catalog,
            comments,
            difficulty: HashMap::new(),
            tags: HashMap::new(),
            posted: HashMap::new(),
        }
    }

    /// Loads the catalogue (required) and the comment pool (optional).
    pub(crate) fn load(settings: &Settings) -> Result<Self> {
        let catalog = Catalog::load(&settings.data).with_context(|| {
            format!(
                "Failed to load catalogue from {} (run `crag import <seed.json>` to create it)",
                settings.data.display()
            )
        })?;

        let comments = if settings.comments.is_file() {
            CommentPool::load(&settings.comments).with_context(|| {
                format!(
                    "Failed to load comments from {}",
                    settings.comments.display()
                )
            })?
        } else {
            log::info!(
                "No comment pool at {}; route pages will show no comments",
                settings.comments.display()
            );
            CommentPool::default()
        };

        let counts = catalog.counts();
        log::info!(
            "Catalogue ready: {} headlands, {} sectors, {} routes, {} comments",
            counts.headlands,
            counts.sectors,
            counts.routes,
            comments.len()
        );
        Ok(Self::new(catalog, comments))
    }

    pub fn difficulty_tally(&self, route_slug: &str, viewer: Option<&str>) -> ConsensusTally {
        self.difficulty
            .get(route_slug)
            .map(|ballot| ballot.tally(viewer))
            .unwrap_or_else(|| DifficultyBallot::new().tally(viewer))
    }

    pub fn tag_tally(&self, route: &Route, viewer: Option<&str>) -> Vec<TagCount> {
        match self.tags.get(&route.slug) {
            Some(ballot) => ballot.tally(viewer),
            None => TagBallot::from_seed_tags(&route.tags).tally(viewer),
        }
    }

    /// Records or (with `None`) retracts `user`'s vote. The route must exist.
    pub fn vote_difficulty(
        &mut self,
        route_slug: &str,
        user: &str,
        vote: Option<DifficultyVote>,
    ) -> Result<ConsensusTally> {
        let slug = self.catalog.require_route(route_slug)?.route.slug.clone();
        let ballot = self.difficulty.entry(slug).or_default();
        match vote {
            Some(vote) => {
                ballot.cast(user, vote);
            }
            None => {
                ballot.retract(user);
            }
        }
        Ok(ballot.tally(Some(user)))
    }

    /// Toggles `user`'s vote on `tag`; returns whether the vote is now on.
    pub fn toggle_tag(&mut self, route_slug: &str, user: &str, tag: &str) -> Result<bool> {
        let route = self.catalog.require_route(route_slug)?.route;
        let ballot = self
            .tags
            .entry(route.slug.clone())
            .or_insert_with(|| TagBallot::from_seed_tags(&route.tags));
        Ok(ballot.toggle(tag, user))
    }

    /// Posts a comment on a route; it is listed ahead of older ones.
    pub fn add_comment(
        &mut self,
        route_slug: &str,
        user: &str,
        content: &str,
        tag: CommentTag,
    ) -> Result<Comment> {
        let slug = self.catalog.require_route(route_slug)?.route.slug.clone();
        let posted = self.posted.entry(slug.clone()).or_default();
        let comment = Comment {
            id: format!("{slug}-post-{}", posted.len() + 1),
            user_id: user.to_string(),
            username: user.to_string(),
            user_image: None,
            content: content.to_string(),
            created_at: rfc3339_utc(SystemTime::now()),
            tags: vec![tag],
        };
        posted.insert(0, comment.clone());
        Ok(comment)
    }

    pub fn posted_comments(&self, route_slug: &str) -> &[Comment] {
        self.posted
            .get(route_slug)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Brings per-route state in line with the catalogue after an edit.
    ///
    /// State of deleted routes is dropped; tag ballots pick up the route's
    /// current seed tags.
    pub fn sync_with_catalog(&mut self) {
        let catalog = &self.catalog;
        self.difficulty.retain(|slug, _| catalog.route(slug).is_some());
        self.posted.retain(|slug, _| catalog.route(slug).is_some());
        self.tags.retain(|slug, ballot| match catalog.route(slug) {
            Some(found) => {
                ballot.reseed(&found.route.tags);
                true
            }
            None => false,
        });
    }
}

/// `2025-02-26T10:00:00Z` for the given instant; clocks before 1970 read as
/// the epoch.
fn rfc3339_utc(at: SystemTime) -> String {
    let secs = at
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let (days, rem) = (secs / 86_400, secs % 86_400);
    let (year, month, day) = civil_from_days(days as i64);
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}Z",
        rem / 3600,
        rem % 3600 / 60,
        rem % 60
    )
}

/// Proleptic Gregorian date of a day count since 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
