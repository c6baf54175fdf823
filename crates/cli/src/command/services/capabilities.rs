use crag_protocol::{
    Capabilities, CapabilitiesCatalog, CapabilitiesServer, NextAction,
    CAPABILITIES_SCHEMA_VERSION, COMMAND_API_VERSION,
};
use serde_json::json;

use crate::command::domain::CommandAction;
use crate::command::state::AppState;

pub(crate) fn run(state: &AppState) -> Capabilities {
    let counts = state.catalog.counts();
    let start_args = state
        .catalog
        .headlands
        .first()
        .map(|headland| json!({ "headland": headland.slug }))
        .unwrap_or_else(|| json!({}));

    Capabilities {
        schema_version: CAPABILITIES_SCHEMA_VERSION,
        command_api: COMMAND_API_VERSION.to_string(),
        server: CapabilitiesServer {
            name: "crag-cli".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        catalog: CapabilitiesCatalog {
            headlands: counts.headlands,
            sectors: counts.sectors,
            routes: counts.routes,
            comments: state.comments.len(),
        },
        actions: CommandAction::ALL
            .into_iter()
            .map(|a| a.as_str().to_string())
            .collect(),
        admin_actions: CommandAction::ALL
            .into_iter()
            .filter(|a| a.is_admin())
            .map(|a| a.as_str().to_string())
            .collect(),
        start_route: NextAction {
            action: CommandAction::ListSectors.as_str().to_string(),
            args: start_args,
            reason: "Start from the sector cards of the first headland.".to_string(),
        },
    }
}
