use std::sync::Arc;

use projector_core::config::AppConfig;
use projector_db::InMemoryProjectRepository;
use projector_slack::{CommandDispatcher, InteractionDispatcher, SignatureVerifier, SlackWebClient};
use thiserror::Error;
use tracing::info;

use crate::routes::AppState;

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("slack http client could not be built: {0}")]
    HttpClient(#[source] reqwest::Error),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let api = Arc::new(SlackWebClient::from_config(&config.slack).map_err(BootstrapError::HttpClient)?);
    let projects = Arc::new(InMemoryProjectRepository::new());

    let commands =
        CommandDispatcher::new(SignatureVerifier::new(config.slack.signing_secret.clone()), api.clone());
    let interactions = InteractionDispatcher::new(
        SignatureVerifier::new(config.slack.signing_secret.clone()),
        api,
        projects,
        config.slack.projects_channel.clone(),
    );

    info!(
        event_name = "system.bootstrap.ready",
        correlation_id = "bootstrap",
        api_base_url = %config.slack.api_base_url,
        projects_channel = %config.slack.projects_channel,
        "slack dispatchers initialized"
    );

    Ok(Application {
        config,
        state: AppState { commands: Arc::new(commands), interactions: Arc::new(interactions) },
    })
}
