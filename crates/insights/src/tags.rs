use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub name: String,
    pub votes: usize,
    pub user_voted: bool,
    pub color: &'static str,
}

/// Badge colour for a route tag; unknown tags are gray.
pub fn tag_color(name: &str) -> &'static str {
    match normalize_tag(name).as_str() {
        "pumpy" | "crimpy" => "emerald",
        "run out" | "exposed" => "rose",
        "technical" | "vertical" => "yellow",
        "slabby" | "overhang" => "sky",
        "juggy" | "sustained" => "pink",
        _ => "gray",
    }
}

/// Tag votes for one route.
///
/// Tags that came with the seed data count as one vote each and can't be
/// toggled by users.
#[derive(Debug, Clone, Default)]
pub struct TagBallot {
    seeded: BTreeSet<String>,
    voters: BTreeMap<String, BTreeSet<String>>,
}

impl TagBallot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed_tags<S: AsRef<str>>(tags: &[S]) -> Self {
        let mut ballot = Self::new();
        ballot.reseed(tags);
        ballot
    }

    /// Replaces the seed tags; user votes are kept.
    pub fn reseed<S: AsRef<str>>(&mut self, tags: &[S]) {
        self.seeded = tags
            .iter()
            .map(|t| normalize_tag(t.as_ref()))
            .filter(|t| !t.is_empty())
            .collect();
    }

    /// Flips `user`'s vote on `tag`. Returns whether the user now votes for it.
    ///
    /// Blank tag names are ignored.
    pub fn toggle(&mut self, tag: &str, user: &str) -> bool {
        let tag = normalize_tag(tag);
        if tag.is_empty() {
            return false;
        }

        let users = self.voters.entry(tag.clone()).or_default();
        let voted = if users.remove(user) {
            false
        } else {
            users.insert(user.to_string());
            true
        };
        if users.is_empty() {
            self.voters.remove(&tag);
        }
        voted
    }

    /// Tags by votes descending, then name.
    pub fn tally(&self, viewer: Option<&str>) -> Vec<TagCount> {
        let names: BTreeSet<&String> = self.seeded.iter().chain(self.voters.keys()).collect();

        let mut counts: Vec<TagCount> = names
            .into_iter()
            .map(|name| {
                let users = self.voters.get(name);
                let votes = usize::from(self.seeded.contains(name))
                    + users.map_or(0, BTreeSet::len);
                TagCount {
                    name: name.clone(),
                    votes,
                    user_voted: viewer
                        .zip(users)
                        .is_some_and(|(viewer, users)| users.contains(viewer)),
                    color: tag_color(name),
                }
            })
            .collect();

        counts.sort_by(|a, b| b.votes.cmp(&a.votes).then_with(|| a.name.cmp(&b.name)));
        counts
    }
}

fn normalize_tag(raw: &str) -> String {
    raw.trim().to_lowercase()
}
