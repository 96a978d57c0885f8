use std::sync::Arc;

use tracing::{error, info, warn};

use crate::ack::Acknowledgment;
use crate::blocks::create_project_modal;
use crate::client::{ApiError, SlackApi};
use crate::form::FormFields;
use crate::signature::{SignatureHeaders, SignatureVerifier};

pub const CREATE_PROJECT_COMMAND: &str = "/create-project";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlashCommandPayload {
    pub command: String,
    pub text: String,
    pub channel_id: String,
    pub user_id: String,
    pub trigger_id: String,
}

impl SlashCommandPayload {
    /// Absent fields decode to empty strings.
    pub fn from_form(fields: &FormFields) -> Self {
        let field = |name: &str| fields.get(name).unwrap_or_default().to_owned();
        Self {
            command: field("command"),
            text: field("text"),
            channel_id: field("channel_id"),
            user_id: field("user_id"),
            trigger_id: field("trigger_id"),
        }
    }
}

/// Work to run after the acknowledgment has been written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenModal {
    pub trigger_id: String,
    pub user_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandOutcome {
    pub ack: Acknowledgment,
    pub follow_up: Option<OpenModal>,
}

impl CommandOutcome {
    fn ack_only(ack: Acknowledgment) -> Self {
        Self { ack, follow_up: None }
    }
}

pub struct CommandDispatcher {
    verifier: SignatureVerifier,
    api: Arc<dyn SlackApi>,
}

impl CommandDispatcher {
    pub fn new(verifier: SignatureVerifier, api: Arc<dyn SlackApi>) -> Self {
        Self { verifier, api }
    }

    /// Decides the acknowledgment without touching the network. A matching
    /// command carries an [`OpenModal`] follow-up for [`Self::complete`].
    pub fn handle(&self, raw_body: &[u8], headers: SignatureHeaders<'_>) -> CommandOutcome {
        if let Err(reason) = self.verifier.check(raw_body, headers) {
            warn!(
                event_name = "ingress.slack.signature_rejected",
                route = "commands",
                reason = %reason,
                "rejecting slash command with invalid signature"
            );
            return CommandOutcome::ack_only(Acknowledgment::Rejected);
        }

        let payload = SlashCommandPayload::from_form(&FormFields::parse(raw_body));
        info!(
            event_name = "ingress.slack.command_received",
            correlation_id = %payload.trigger_id,
            command = %payload.command,
            user_id = %payload.user_id,
            "slash command received"
        );

        if payload.command != CREATE_PROJECT_COMMAND {
            return CommandOutcome::ack_only(Acknowledgment::ok());
        }

        if payload.trigger_id.is_empty() {
            warn!(
                event_name = "ingress.slack.command_missing_trigger",
                correlation_id = "",
                user_id = %payload.user_id,
                "create-project command has no trigger_id; modal will not be opened"
            );
            return CommandOutcome::ack_only(Acknowledgment::empty());
        }

        CommandOutcome {
            ack: Acknowledgment::empty(),
            follow_up: Some(OpenModal {
                trigger_id: payload.trigger_id,
                user_id: payload.user_id,
            }),
        }
    }

    pub async fn open_modal(&self, request: &OpenModal) -> Result<(), ApiError> {
        self.api.open_view(&request.trigger_id, &create_project_modal()).await.map(|_| ())
    }

    /// Error boundary for the follow-up. Failures are logged and dropped.
    pub async fn complete(&self, request: OpenModal) {
        match self.open_modal(&request).await {
            Ok(()) => info!(
                event_name = "egress.slack.modal_opened",
                correlation_id = %request.trigger_id,
                user_id = %request.user_id,
                "create-project modal opened"
            ),
            Err(api_error) => error!(
                event_name = "egress.slack.modal_open_failed",
                correlation_id = %request.trigger_id,
                method = api_error.method(),
                error_code = api_error.code().unwrap_or_default(),
                body = ?api_error.body(),
                error = %api_error,
                "views.open failed"
            ),
        }
    }
}
