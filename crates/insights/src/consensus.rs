use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a climber felt the grade compared to the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyVote {
    Sandbag,
    Staunch,
    Stiff,
    Fair,
    Easy,
    Overgraded,
}

impl DifficultyVote {
    /// Hardest-feeling first.
    pub const ALL: [DifficultyVote; 6] = [
        DifficultyVote::Sandbag,
        DifficultyVote::Staunch,
        DifficultyVote::Stiff,
        DifficultyVote::Fair,
        DifficultyVote::Easy,
        DifficultyVote::Overgraded,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            DifficultyVote::Sandbag => "sandbag",
            DifficultyVote::Staunch => "staunch",
            DifficultyVote::Stiff => "stiff",
            DifficultyVote::Fair => "fair",
            DifficultyVote::Easy => "easy",
            DifficultyVote::Overgraded => "overgraded",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            DifficultyVote::Sandbag => "Much harder than the grade suggests",
            DifficultyVote::Staunch => "Slightly harder than the grade suggests",
            DifficultyVote::Stiff => "On the harder side of the grade",
            DifficultyVote::Fair => "Accurately graded",
            DifficultyVote::Easy => "On the easier side of the grade",
            DifficultyVote::Overgraded => "Easier than the grade suggests",
        }
    }
}

impl fmt::Display for DifficultyVote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyVote {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        DifficultyVote::ALL
            .into_iter()
            .find(|vote| vote.as_str() == wanted)
            .ok_or_else(|| format!("unknown difficulty vote: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteCount {
    pub option: DifficultyVote,
    pub description: &'static str,
    pub count: usize,
    /// Share of all votes, rounded half up to a whole percent.
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsensusTally {
    pub votes: Vec<VoteCount>,
    pub total_votes: usize,
    pub consensus: Option<DifficultyVote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_vote: Option<DifficultyVote>,
}

/// Difficulty votes for one route, at most one per user.
#[derive(Debug, Clone, Default)]
pub struct DifficultyBallot {
    votes: BTreeMap<String, DifficultyVote>,
}

impl DifficultyBallot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `vote` for `user`, returning the vote it replaced.
    pub fn cast(&mut self, user: &str, vote: DifficultyVote) -> Option<DifficultyVote> {
        self.votes.insert(user.to_string(), vote)
    }

    pub fn retract(&mut self, user: &str) -> Option<DifficultyVote> {
        self.votes.remove(user)
    }

    pub fn vote_of(&self, user: &str) -> Option<DifficultyVote> {
        self.votes.get(user).copied()
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    pub fn tally(&self, viewer: Option<&str>) -> ConsensusTally {
        let mut counts = [0usize; 6];
        for vote in self.votes.values() {
            counts[slot(*vote)] += 1;
        }
        let mut tally = tally_counts(counts);
        tally.user_vote = viewer.and_then(|user| self.vote_of(user));
        tally
    }
}

const fn slot(vote: DifficultyVote) -> usize {
    match vote {
        DifficultyVote::Sandbag => 0,
        DifficultyVote::Staunch => 1,
        DifficultyVote::Stiff => 2,
        DifficultyVote::Fair => 3,
        DifficultyVote::Easy => 4,
        DifficultyVote::Overgraded => 5,
    }
}

fn tally_counts(counts: [usize; 6]) -> ConsensusTally {
    let total_votes: usize = counts.iter().sum();

    let votes: Vec<VoteCount> = DifficultyVote::ALL
        .into_iter()
        .zip(counts)
        .map(|(option, count)| VoteCount {
            option,
            description: option.description(),
            count,
            percentage: rounded_percentage(count, total_votes),
        })
        .collect();

    // On equal counts the later option wins.
    let consensus = if total_votes == 0 {
        None
    } else {
        votes
            .iter()
            .reduce(|best, next| if best.count > next.count { best } else { next })
            .map(|v| v.option)
    };

    ConsensusTally {
        votes,
        total_votes,
        consensus,
        user_vote: None,
    }
}

fn rounded_percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count * 200 + total) / (total * 2)) as u32
}
