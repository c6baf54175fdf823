mod admin;
pub(crate) mod browse;
mod capabilities;
mod comments;
mod votes;

use anyhow::{Context as AnyhowContext, Result};
use crag_catalog::{Catalog, CatalogCounts, HeadlandDraft};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use tokio::sync::RwLock;

use crate::command::domain::{
    parse_payload, AddCommentPayload, CommandAction, CommandOutcome, CreateRoutePayload, CreateSectorPayload,
    DeleteRoutePayload, HintKind, UpdateHeadlandPayload, UpdateRoutePayload,
};
use crate::command::state::AppState;

pub struct Services {
    state: RwLock<AppState>,
    /// Where admin edits are written; `None` keeps them in memory.
    persist: Option<PathBuf>,
}

impl Services {
    pub fn new(state: AppState, persist: Option<PathBuf>) -> Self {
        Self {
            state: RwLock::new(state),
            persist,
        }
    }

    pub async fn counts(&self) -> CatalogCounts {
        self.state.read().await.catalog.counts()
    }

    pub async fn route(&self, action: CommandAction, payload: Value) -> Result<CommandOutcome> {
        match action {
            CommandAction::Capabilities => {
                CommandOutcome::from_value(capabilities::run(&*self.state.read().await))
            }
            CommandAction::ListHeadlands => {
                CommandOutcome::from_value(browse::list_headlands(&*self.state.read().await))
            }
            CommandAction::ListSectors => {
                let out = browse::list_sectors(&*self.state.read().await, parse_payload(payload)?)?;
                let next = out.sectors.first().map(|s| json!({ "slug": s.slug }));
                let outcome = CommandOutcome::from_value(out)?;
                Ok(match next {
                    Some(args) => outcome.with_next_action(
                        CommandAction::Sector,
                        args,
                        "Open a sector's route table.",
                    ),
                    None => outcome,
                })
            }
            CommandAction::Sector => {
                let out = browse::sector(&*self.state.read().await, parse_payload(payload)?)?;
                let empty = out.routes.is_empty() && out.filter.is_active();
                let outcome = CommandOutcome::from_value(out)?;
                Ok(if empty {
                    outcome.with_hint(HintKind::Info, "No routes match the filter; widen it.")
                } else {
                    outcome
                })
            }
            CommandAction::Route => {
                let view = browse::route(&*self.state.read().await, parse_payload(payload)?)?;
                let hidden = view.comments.iter().filter(|c| c.hidden_by_default).count();
                let outcome = CommandOutcome::from_value(view)?;
                Ok(if hidden > 0 {
                    outcome.with_hint(
                        HintKind::Info,
                        format!("{hidden} beta comment(s) are hidden by default."),
                    )
                } else {
                    outcome
                })
            }
            CommandAction::Search => {
                let out = browse::search(&*self.state.read().await, parse_payload(payload)?)?;
                let empty = out.results.is_empty() && out.ranked.is_empty();
                let retry = json!({ "query": out.query, "fuzzy": true });
                let outcome = CommandOutcome::from_value(out)?;
                Ok(if empty {
                    outcome.with_next_action(
                        CommandAction::Search,
                        retry,
                        "No exact matches; try fuzzy ranking.",
                    )
                } else {
                    outcome
                })
            }
            CommandAction::VoteDifficulty => {
                let mut state = self.state.write().await;
                CommandOutcome::from_value(votes::difficulty(&mut state, parse_payload(payload)?)?)
            }
            CommandAction::VoteTag => {
                let mut state = self.state.write().await;
                CommandOutcome::from_value(votes::tag(&mut state, parse_payload(payload)?)?)
            }
            CommandAction::AddComment => {
                let payload: AddCommentPayload = parse_payload(payload)?;
                let args = json!({ "slug": payload.route, "viewer": payload.user.trim() });
                let view = comments::add(&mut *self.state.write().await, payload)?;
                Ok(CommandOutcome::from_value(view)?.with_next_action(
                    CommandAction::Route,
                    args,
                    "See the comment on the route page.",
                ))
            }
            CommandAction::CreateHeadland => {
                let draft: HeadlandDraft = parse_payload(payload)?;
                self.edit(|catalog| admin::create_headland(catalog, draft))
                    .await
            }
            CommandAction::UpdateHeadland => {
                let payload: UpdateHeadlandPayload = parse_payload(payload)?;
                self.edit(|catalog| admin::update_headland(catalog, payload))
                    .await
            }
            CommandAction::CreateSector => {
                let payload: CreateSectorPayload = parse_payload(payload)?;
                self.edit(|catalog| admin::create_sector(catalog, payload))
                    .await
            }
            CommandAction::CreateRoute => {
                let payload: CreateRoutePayload = parse_payload(payload)?;
                self.edit(|catalog| admin::create_route(catalog, payload))
                    .await
            }
            CommandAction::UpdateRoute => {
                let payload: UpdateRoutePayload = parse_payload(payload)?;
                self.edit(|catalog| admin::update_route(catalog, payload))
                    .await
            }
            CommandAction::DeleteRoute => {
                let payload: DeleteRoutePayload = parse_payload(payload)?;
                self.edit(|catalog| admin::delete_route(catalog, payload))
                    .await
            }
        }
    }

    /// Applies `apply` to a copy of the catalogue, saves it, then swaps it in.
    async fn edit<T, F>(&self, apply: F) -> Result<CommandOutcome>
    where
        T: Serialize,
        F: FnOnce(&mut Catalog) -> Result<T>,
    {
        let mut state = self.state.write().await;
        let mut next = state.catalog.clone();
        let value = apply(&mut next)?;

        let mut outcome = CommandOutcome::from_value(value)?;
        match &self.persist {
            Some(path) => {
                next.save(path)
                    .with_context(|| format!("Failed to save catalogue to {}", path.display()))?;
                outcome.meta.catalog_saved = Some(true);
                outcome.meta.data_path = Some(path.display().to_string());
            }
            None => {
                outcome.meta.catalog_saved = Some(false);
                outcome = outcome.with_hint(
                    HintKind::Warn,
                    "Edit kept in memory only; it is lost when the server stops.",
                );
            }
        }

        state.catalog = next;
        state.sync_with_catalog();
        Ok(outcome)
    }
}
