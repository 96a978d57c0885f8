use std::future::Future;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tracing::error;

use projector_slack::ack::{INVALID_PAYLOAD_BODY, INVALID_SIGNATURE_BODY};
use projector_slack::{
    Acknowledgment, CommandDispatcher, InteractionDispatcher, SignatureHeaders, SIGNATURE_HEADER,
    TIMESTAMP_HEADER,
};

use crate::health;

pub const COMMANDS_PATH: &str = "/slack/commands";
pub const INTERACTIONS_PATH: &str = "/slack/interactions";

#[derive(Clone)]
pub struct AppState {
    pub commands: Arc<CommandDispatcher>,
    pub interactions: Arc<InteractionDispatcher>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(COMMANDS_PATH, post(slash_command))
        .route(INTERACTIONS_PATH, post(interaction))
        .merge(health::router::<AppState>())
        .with_state(state)
}

async fn slash_command(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let outcome = state.commands.handle(&body, signature_headers(&headers));

    if let Some(request) = outcome.follow_up {
        let dispatcher = Arc::clone(&state.commands);
        spawn_follow_up("open_modal", async move { dispatcher.complete(request).await });
    }

    acknowledgment_response(outcome.ack)
}

async fn interaction(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let outcome = match state.interactions.handle(&body, signature_headers(&headers)).await {
        Ok(outcome) => outcome,
        Err(app_error) => {
            error!(
                event_name = "ingress.slack.interaction_failed",
                error = %app_error,
                "interaction could not be processed"
            );
            return (StatusCode::INTERNAL_SERVER_ERROR, app_error.user_message()).into_response();
        }
    };

    if let Some(notification) = outcome.follow_up {
        let dispatcher = Arc::clone(&state.interactions);
        spawn_follow_up("project_notifications", async move {
            dispatcher.complete(notification).await;
        });
    }

    acknowledgment_response(outcome.ack)
}

/// Header values that are not visible ASCII are treated as absent.
fn signature_headers(headers: &HeaderMap) -> SignatureHeaders<'_> {
    SignatureHeaders {
        timestamp: headers.get(TIMESTAMP_HEADER).and_then(|value| value.to_str().ok()),
        signature: headers.get(SIGNATURE_HEADER).and_then(|value| value.to_str().ok()),
    }
}

fn acknowledgment_response(ack: Acknowledgment) -> Response {
    match ack {
        Acknowledgment::Rejected => (StatusCode::UNAUTHORIZED, INVALID_SIGNATURE_BODY).into_response(),
        Acknowledgment::InvalidPayload => {
            (StatusCode::BAD_REQUEST, INVALID_PAYLOAD_BODY).into_response()
        }
        Acknowledgment::Text(text) => (StatusCode::OK, text).into_response(),
        Acknowledgment::View(view) => (StatusCode::OK, Json(view)).into_response(),
    }
}

/// Runs `task` detached from the request. A panic inside the task is logged
/// and goes no further.
fn spawn_follow_up<F>(name: &'static str, task: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    let handle = tokio::spawn(task);
    tokio::spawn(async move {
        if let Err(join_error) = handle.await {
            error!(
                event_name = "system.follow_up.aborted",
                follow_up = name,
                error = %join_error,
                "follow-up task terminated abnormally"
            );
        }
    });
}
