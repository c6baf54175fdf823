use anyhow::Result;
use crag_catalog::{
    slugify, validate_slug, CatalogError, Comment, CommentTag, EntityKind, HeadlandDraft,
    HeadlandNav, Route, RoutePatch, SectorDraft, SectorSummary,
};
use crag_insights::{ConsensusTally, DifficultyVote, TagCount};
use crag_protocol::{ErrorEnvelope, NextAction, RouteFilter};
use crag_search::{FuzzyHit, SearchError, SearchResults};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

pub const DEFAULT_SEARCH_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub action: CommandAction,
    #[serde(default = "empty_payload")]
    pub payload: Value,
}

impl CommandRequest {
    pub fn new<T: Serialize>(action: CommandAction, payload: T) -> Result<Self> {
        Ok(Self {
            action,
            payload: serde_json::to_value(payload)?,
        })
    }
}

fn empty_payload() -> Value {
    Value::Object(Default::default())
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandAction {
    Capabilities,
    ListHeadlands,
    ListSectors,
    Sector,
    Route,
    Search,
    VoteDifficulty,
    VoteTag,
    AddComment,
    CreateHeadland,
    UpdateHeadland,
    CreateSector,
    CreateRoute,
    UpdateRoute,
    DeleteRoute,
}

impl CommandAction {
    pub const ALL: [CommandAction; 15] = [
        CommandAction::Capabilities,
        CommandAction::ListHeadlands,
        CommandAction::ListSectors,
        CommandAction::Sector,
        CommandAction::Route,
        CommandAction::Search,
        CommandAction::VoteDifficulty,
        CommandAction::VoteTag,
        CommandAction::AddComment,
        CommandAction::CreateHeadland,
        CommandAction::UpdateHeadland,
        CommandAction::CreateSector,
        CommandAction::CreateRoute,
        CommandAction::UpdateRoute,
        CommandAction::DeleteRoute,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            CommandAction::Capabilities => "capabilities",
            CommandAction::ListHeadlands => "list_headlands",
            CommandAction::ListSectors => "list_sectors",
            CommandAction::Sector => "sector",
            CommandAction::Route => "route",
            CommandAction::Search => "search",
            CommandAction::VoteDifficulty => "vote_difficulty",
            CommandAction::VoteTag => "vote_tag",
            CommandAction::AddComment => "add_comment",
            CommandAction::CreateHeadland => "create_headland",
            CommandAction::UpdateHeadland => "update_headland",
            CommandAction::CreateSector => "create_sector",
            CommandAction::CreateRoute => "create_route",
            CommandAction::UpdateRoute => "update_route",
            CommandAction::DeleteRoute => "delete_route",
        }
    }

    /// Catalogue edits; guarded by the bearer token over HTTP.
    pub const fn is_admin(self) -> bool {
        matches!(
            self,
            CommandAction::CreateHeadland
                | CommandAction::UpdateHeadland
                | CommandAction::CreateSector
                | CommandAction::CreateRoute
                | CommandAction::UpdateRoute
                | CommandAction::DeleteRoute
        )
    }

    pub const fn mutates_state(self) -> bool {
        self.is_admin()
            || matches!(
                self,
                CommandAction::VoteDifficulty | CommandAction::VoteTag | CommandAction::AddComment
            )
    }
}

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub status: CommandStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEnvelope>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<Hint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next_actions: Vec<NextAction>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub meta: ResponseMeta,
}

impl CommandResponse {
    pub fn is_error(&self) -> bool {
        matches!(self.status, CommandStatus::Error)
    }

    pub fn error_code(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.code.as_str())
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Ok,
    Error,
}

#[derive(Debug, Serialize, Clone)]
pub struct Hint {
    #[serde(rename = "type")]
    pub kind: HintKind,
    pub text: String,
}

#[derive(Debug, Serialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum HintKind {
    Info,
    Action,
    Warn,
}

#[derive(Debug, Serialize, Default, Clone)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_saved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
}

pub struct CommandOutcome {
    pub data: Value,
    pub hints: Vec<Hint>,
    pub meta: ResponseMeta,
    pub next_actions: Vec<NextAction>,
}

impl CommandOutcome {
    pub fn from_value<T: Serialize>(value: T) -> Result<Self> {
        Ok(Self {
            data: serde_json::to_value(value)?,
            hints: Vec::new(),
            meta: ResponseMeta::default(),
            next_actions: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_hint(mut self, kind: HintKind, text: impl Into<String>) -> Self {
        self.hints.push(Hint {
            kind,
            text: text.into(),
        });
        self
    }

    #[must_use]
    pub fn with_next_action(mut self, action: CommandAction, args: Value, reason: &str) -> Self {
        self.next_actions.push(next_action(action, args, reason));
        self
    }
}

pub fn next_action(action: CommandAction, args: Value, reason: &str) -> NextAction {
    NextAction {
        action: action.as_str().to_string(),
        args,
        reason: reason.to_string(),
    }
}

/// Request-shape problems that are not catalogue errors.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Invalid payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("{0} must be non-empty")]
    Blank(&'static str),
}

pub fn parse_payload<T: DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(payload)
        .map_err(RequestError::from)
        .map_err(Into::into)
}

pub fn require_non_blank(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RequestError::Blank(field).into());
    }
    Ok(())
}

// Payloads

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListSectorsPayload {
    #[serde(default)]
    pub headland: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SectorPayload {
    pub slug: String,
    #[serde(default)]
    pub filter: RouteFilter,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoutePayload {
    pub slug: String,
    #[serde(default)]
    pub viewer: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchPayload {
    pub query: String,
    #[serde(default)]
    pub fuzzy: bool,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// `vote: null` retracts the user's vote.
#[derive(Debug, Serialize, Deserialize)]
pub struct VoteDifficultyPayload {
    pub route: String,
    pub user: String,
    #[serde(default)]
    pub vote: Option<DifficultyVote>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoteTagPayload {
    pub route: String,
    pub user: String,
    pub tag: String,
}

/// Untagged comments are filed as beta.
#[derive(Debug, Serialize, Deserialize)]
pub struct AddCommentPayload {
    pub route: String,
    pub user: String,
    pub content: String,
    #[serde(default = "default_comment_tag")]
    pub tag: CommentTag,
}

fn default_comment_tag() -> CommentTag {
    CommentTag::Beta
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateHeadlandPayload {
    pub slug: String,
    pub headland: HeadlandDraft,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSectorPayload {
    pub headland: String,
    pub sector: SectorDraft,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateRoutePayload {
    pub sector: String,
    pub route: Route,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateRoutePayload {
    pub slug: String,
    pub patch: RoutePatch,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteRoutePayload {
    pub slug: String,
}

// Outputs

#[derive(Debug, Serialize)]
pub struct HeadlandsOutput {
    pub headlands: Vec<HeadlandNav>,
}

#[derive(Debug, Serialize)]
pub struct SectorsOutput {
    pub sectors: Vec<SectorSummary>,
}

#[derive(Debug, Serialize)]
pub struct SectorOutput {
    pub summary: SectorSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_range: Option<GradeRange>,
    pub filter: RouteFilter,
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GradeRange {
    pub min: i32,
    pub max: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityLink {
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    /// Beta comments are collapsed until the reader asks for them.
    pub hidden_by_default: bool,
}

#[derive(Debug, Serialize)]
pub struct RouteView {
    pub headland: EntityLink,
    pub sector: EntityLink,
    pub route: Route,
    pub comments: Vec<CommentView>,
    pub difficulty: ConsensusTally,
    pub tags: Vec<TagCount>,
}

#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub query: String,
    #[serde(flatten)]
    pub results: SearchResults,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranked: Vec<FuzzyHit>,
}

#[derive(Debug, Serialize)]
pub struct TagVoteOutput {
    pub route: String,
    pub tag: String,
    pub voted: bool,
    pub tags: Vec<TagCount>,
}

#[derive(Debug, Serialize)]
pub struct DeletedOutput {
    pub deleted: Route,
}

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub code: String,
    pub hint: Option<String>,
    pub next_actions: Vec<NextAction>,
}

/// Maps a service error onto a stable code, a hint and follow-up actions.
pub fn classify_error(err: &anyhow::Error, action: Option<CommandAction>) -> ErrorClassification {
    let mut next_actions = Vec::new();

    if let Some(err) = err.downcast_ref::<CatalogError>() {
        let hint = match err {
            CatalogError::NotFound { kind, slug } => {
                if *kind != EntityKind::Headland {
                    next_actions.push(next_action(
                        CommandAction::Search,
                        json!({ "query": slug.replace('-', " "), "fuzzy": true }),
                        "Look the name up instead of the slug.",
                    ));
                }
                Some(format!(
                    "No {kind} with that slug. Use list_headlands or search to find valid slugs."
                ))
            }
            CatalogError::DuplicateSlug { .. } => {
                Some("Slugs are unique per kind across the whole catalogue; pick another.".into())
            }
            CatalogError::InvalidSlug(raw) => {
                let suggestion = slugify(raw);
                Some(if validate_slug(&suggestion).is_ok() {
                    format!("Slugs are lowercase letters and digits joined by single hyphens; try `{suggestion}`.")
                } else {
                    "Slugs look like `lekker-time`: lowercase letters and digits joined by single hyphens.".into()
                })
            }
            CatalogError::MalformedSeed(_) | CatalogError::Json(_) => {
                Some("Re-run `crag import` on the seed document to rebuild the catalogue.".into())
            }
            _ => None,
        };
        return ErrorClassification {
            code: err.code().to_string(),
            hint,
            next_actions,
        };
    }

    if let Some(err) = err.downcast_ref::<SearchError>() {
        return ErrorClassification {
            code: err.code().to_string(),
            hint: Some("Pass a non-empty payload.query.".to_string()),
            next_actions,
        };
    }

    if err.downcast_ref::<RequestError>().is_some() {
        return ErrorClassification {
            code: "invalid_request".to_string(),
            hint: Some(match action {
                Some(action) => format!(
                    "Check the payload for action={} against the capabilities listing.",
                    action.as_str()
                ),
                None => "Verify the request matches the Command API schema.".to_string(),
            }),
            next_actions: vec![next_action(
                CommandAction::Capabilities,
                json!({}),
                "List actions and what they expect.",
            )],
        };
    }

    ErrorClassification {
        code: "internal".to_string(),
        hint: None,
        next_actions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_names_round_trip_through_serde() {
        for action in CommandAction::ALL {
            let parsed: CommandAction =
                serde_json::from_value(Value::String(action.as_str().to_string())).unwrap();
            assert_eq!(parsed, action);
        }
    }

    #[test]
    fn admin_actions_are_the_edits() {
        let admin: Vec<&str> = CommandAction::ALL
            .into_iter()
            .filter(|a| a.is_admin())
            .map(CommandAction::as_str)
            .collect();
        assert_eq!(
            admin,
            vec![
                "create_headland",
                "update_headland",
                "create_sector",
                "create_route",
                "update_route",
                "delete_route"
            ]
        );
        assert!(CommandAction::VoteTag.mutates_state());
        assert!(CommandAction::AddComment.mutates_state());
        assert!(!CommandAction::AddComment.is_admin());
        assert!(!CommandAction::Search.mutates_state());
    }

    #[test]
    fn request_defaults_to_empty_payload() {
        let request: CommandRequest =
            serde_json::from_str(r#"{"action":"list_headlands"}"#).unwrap();
        assert_eq!(request.action, CommandAction::ListHeadlands);
        assert!(request.payload.as_object().unwrap().is_empty());
    }

    #[test]
    fn classifies_not_found_with_search_follow_up() {
        let err: anyhow::Error = CatalogError::not_found(EntityKind::Route, "the-nose").into();
        let classification = classify_error(&err, Some(CommandAction::Route));
        assert_eq!(classification.code, "not_found");
        assert_eq!(classification.next_actions[0].action, "search");
        assert_eq!(classification.next_actions[0].args["query"], "the nose");
    }

    #[test]
    fn invalid_slug_hint_suggests_a_slug() {
        let err: anyhow::Error = CatalogError::InvalidSlug("Kalk Bay".into()).into();
        let classification = classify_error(&err, Some(CommandAction::CreateHeadland));
        assert_eq!(classification.code, "invalid_request");
        assert!(classification.hint.unwrap().contains("try `kalk-bay`"));

        let err: anyhow::Error = CatalogError::InvalidSlug("--".into()).into();
        let hint = classify_error(&err, None).hint.unwrap();
        assert!(hint.contains("`lekker-time`"));
    }

    #[test]
    fn comment_payload_defaults_to_beta() {
        let payload: AddCommentPayload = serde_json::from_value(
            json!({"route": "the-nose", "user": "ana", "content": "Crux is high"}),
        )
        .unwrap();
        assert_eq!(payload.tag, CommentTag::Beta);

        let err = parse_payload::<AddCommentPayload>(
            json!({"route": "the-nose", "user": "ana", "content": "x", "tag": "spray"}),
        )
        .unwrap_err();
        assert_eq!(classify_error(&err, None).code, "invalid_request");
    }

    #[test]
    fn classifies_payload_errors_as_invalid_request() {
        let err = parse_payload::<RoutePayload>(json!({"viewer": "ana"})).unwrap_err();
        assert_eq!(classify_error(&err, None).code, "invalid_request");

        let err = require_non_blank("user", "  ").unwrap_err();
        assert_eq!(err.to_string(), "user must be non-empty");
        assert_eq!(classify_error(&err, None).code, "invalid_request");

        let err = anyhow::anyhow!("disk on fire");
        assert_eq!(classify_error(&err, None).code, "internal");
    }
}
