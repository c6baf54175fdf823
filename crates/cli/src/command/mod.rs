pub mod domain;
mod services;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use domain::{
    classify_error, CommandAction, CommandRequest, CommandResponse, CommandStatus, Hint,
    HintKind, ResponseMeta,
};
pub(crate) use services::browse;
pub use state::AppState;

use crag_catalog::CatalogCounts;
use crag_protocol::ErrorEnvelope;
use services::Services;
use std::path::PathBuf;
use std::time::Instant;

pub struct CommandHandler {
    services: Services,
}

impl CommandHandler {
    /// `persist` is the catalogue file admin edits are written back to.
    pub fn new(state: AppState, persist: Option<PathBuf>) -> Self {
        Self {
            services: Services::new(state, persist),
        }
    }

    pub async fn counts(&self) -> CatalogCounts {
        self.services.counts().await
    }

    pub async fn execute(&self, request: CommandRequest) -> CommandResponse {
        let started = Instant::now();
        let CommandRequest { action, payload } = request;
        log::debug!("Executing action={}", action.as_str());

        match self.services.route(action, payload).await {
            Ok(mut outcome) => {
                if action.mutates_state() {
                    log::info!("action={} changed state", action.as_str());
                }
                outcome.meta.duration_ms = Some(started.elapsed().as_millis() as u64);
                CommandResponse {
                    status: CommandStatus::Ok,
                    message: None,
                    error: None,
                    hints: outcome.hints,
                    next_actions: outcome.next_actions,
                    data: outcome.data,
                    meta: outcome.meta,
                }
            }
            Err(err) => {
                let message = format!("{err:#}");
                log::debug!("action={} failed: {message}", action.as_str());
                let classification = classify_error(&err, Some(action));
                let hints = classification
                    .hint
                    .iter()
                    .map(|text| Hint {
                        kind: HintKind::Action,
                        text: text.clone(),
                    })
                    .collect();
                let error = ErrorEnvelope {
                    code: classification.code,
                    message: message.clone(),
                    details: None,
                    hint: classification.hint,
                    next_actions: classification.next_actions.clone(),
                };

                CommandResponse {
                    status: CommandStatus::Error,
                    message: Some(message),
                    error: Some(error),
                    hints,
                    next_actions: classification.next_actions,
                    data: serde_json::Value::Null,
                    meta: ResponseMeta {
                        duration_ms: Some(started.elapsed().as_millis() as u64),
                        ..Default::default()
                    },
                }
            }
        }
    }
}
