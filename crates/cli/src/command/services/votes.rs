use anyhow::Result;
use crag_insights::ConsensusTally;

use crate::command::domain::{
    require_non_blank, TagVoteOutput, VoteDifficultyPayload, VoteTagPayload,
};
use crate::command::state::AppState;

pub(crate) fn difficulty(state: &mut AppState, payload: VoteDifficultyPayload) -> Result<ConsensusTally> {
    require_non_blank("user", &payload.user)?;
    match payload.vote {
        Some(vote) => log::debug!("{} votes {vote} on {}", payload.user, payload.route),
        None => log::debug!("{} retracts vote on {}", payload.user, payload.route),
    }
    state.vote_difficulty(&payload.route, payload.user.trim(), payload.vote)
}

pub(crate) fn tag(state: &mut AppState, payload: VoteTagPayload) -> Result<TagVoteOutput> {
    require_non_blank("user", &payload.user)?;
    require_non_blank("tag", &payload.tag)?;
    let user = payload.user.trim();

    let voted = state.toggle_tag(&payload.route, user, &payload.tag)?;
    let route = state.catalog.require_route(&payload.route)?.route;
    Ok(TagVoteOutput {
        tags: state.tag_tally(route, Some(user)),
        route: route.slug.clone(),
        tag: payload.tag.trim().to_lowercase(),
        voted,
    })
}
