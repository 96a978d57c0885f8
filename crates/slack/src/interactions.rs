//! `view_submission` handling for the create-project modal.
//!
//! The project is created and the modal answer decided before the
//! acknowledgment goes out; notifying the creator and the projects channel is
//! left to a follow-up so the platform is never kept waiting on outbound calls.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use projector_core::domain::project::{Project, ProjectDraft};
use projector_core::errors::{ApplicationError, DomainError};
use projector_db::repositories::ProjectRepository;

use crate::ack::{Acknowledgment, ViewResponse};
use crate::blocks::{
    project_created_text, CREATE_PROJECT_CALLBACK_ID, DESCRIPTION_ACTION_ID, DESCRIPTION_BLOCK_ID,
    NAME_ACTION_ID, NAME_BLOCK_ID,
};
use crate::client::{ApiError, SlackApi};
use crate::form::FormFields;
use crate::signature::{SignatureHeaders, SignatureVerifier};

pub const VIEW_SUBMISSION: &str = "view_submission";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("interaction payload is not valid JSON: {0}")]
    InvalidJson(String),
}

fn str_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter().try_fold(value, |current, key| current.get(*key)).and_then(Value::as_str)
}

/// Form values as typed by the user, untrimmed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectSubmission {
    pub user_id: Option<String>,
    pub view_id: Option<String>,
    pub trigger_id: Option<String>,
    pub name: String,
    pub description: String,
}

impl ProjectSubmission {
    fn correlation_id(&self) -> &str {
        self.view_id.as_deref().or(self.trigger_id.as_deref()).unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Interaction {
    CreateProjectSubmission(ProjectSubmission),
    Unrecognized { interaction_type: String, callback_id: Option<String> },
}

impl Interaction {
    /// Decodes the JSON carried in the `payload` form field. Only `type` and
    /// `view.callback_id` decide the variant; other fields that are missing or
    /// of an unexpected type read as absent.
    pub fn parse(payload: &str) -> Result<Self, PayloadError> {
        let value: Value = serde_json::from_str(payload)
            .map_err(|error| PayloadError::InvalidJson(error.to_string()))?;

        let interaction_type = str_at(&value, &["type"]).unwrap_or_default();
        let callback_id = str_at(&value, &["view", "callback_id"]);
        if interaction_type != VIEW_SUBMISSION || callback_id != Some(CREATE_PROJECT_CALLBACK_ID) {
            return Ok(Self::Unrecognized {
                interaction_type: interaction_type.to_owned(),
                callback_id: callback_id.map(str::to_owned),
            });
        }

        let input = |block_id: &str, action_id: &str| {
            str_at(&value, &["view", "state", "values", block_id, action_id, "value"])
                .unwrap_or_default()
                .to_owned()
        };
        Ok(Self::CreateProjectSubmission(ProjectSubmission {
            user_id: str_at(&value, &["user", "id"]).filter(|id| !id.is_empty()).map(str::to_owned),
            view_id: str_at(&value, &["view", "id"]).map(str::to_owned),
            trigger_id: str_at(&value, &["trigger_id"]).map(str::to_owned),
            name: input(NAME_BLOCK_ID, NAME_ACTION_ID),
            description: input(DESCRIPTION_BLOCK_ID, DESCRIPTION_ACTION_ID),
        }))
    }
}

/// Messages announcing a freshly created project.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectNotification {
    pub project: Project,
    pub recipient: Option<String>,
    pub correlation_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InteractionOutcome {
    pub ack: Acknowledgment,
    pub follow_up: Option<ProjectNotification>,
}

impl InteractionOutcome {
    fn ack_only(ack: Acknowledgment) -> Self {
        Self { ack, follow_up: None }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    Skipped,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationReport {
    pub direct_message: Delivery,
    pub announcement: Delivery,
}

pub struct InteractionDispatcher {
    verifier: SignatureVerifier,
    api: Arc<dyn SlackApi>,
    projects: Arc<dyn ProjectRepository>,
    projects_channel: String,
}

impl InteractionDispatcher {
    pub fn new(
        verifier: SignatureVerifier,
        api: Arc<dyn SlackApi>,
        projects: Arc<dyn ProjectRepository>,
        projects_channel: impl Into<String>,
    ) -> Self {
        Self { verifier, api, projects, projects_channel: projects_channel.into() }
    }

    /// Authenticates and decodes an interaction, creating the project for a
    /// valid submission. Only the repository is awaited here.
    pub async fn handle(
        &self,
        raw_body: &[u8],
        headers: SignatureHeaders<'_>,
    ) -> Result<InteractionOutcome, ApplicationError> {
        if let Err(reason) = self.verifier.check(raw_body, headers) {
            warn!(
                event_name = "ingress.slack.signature_rejected",
                route = "interactions",
                reason = %reason,
                "rejecting interaction with invalid signature"
            );
            return Ok(InteractionOutcome::ack_only(Acknowledgment::Rejected));
        }

        let fields = FormFields::parse(raw_body);
        let Some(payload) = fields.get("payload").filter(|payload| !payload.is_empty()) else {
            debug!(event_name = "ingress.slack.interaction_without_payload", "no payload field");
            return Ok(InteractionOutcome::ack_only(Acknowledgment::ok()));
        };

        let submission = match Interaction::parse(payload) {
            Ok(Interaction::CreateProjectSubmission(submission)) => submission,
            Ok(Interaction::Unrecognized { interaction_type, callback_id }) => {
                debug!(
                    event_name = "ingress.slack.interaction_ignored",
                    interaction_type = %interaction_type,
                    callback_id = callback_id.as_deref().unwrap_or_default(),
                    "interaction is not a create-project submission"
                );
                return Ok(InteractionOutcome::ack_only(Acknowledgment::ok()));
            }
            Err(error) => {
                warn!(
                    event_name = "ingress.slack.interaction_invalid_payload",
                    error = %error,
                    "interaction payload could not be decoded"
                );
                return Ok(InteractionOutcome::ack_only(Acknowledgment::InvalidPayload));
            }
        };

        self.create_project(submission).await
    }

    async fn create_project(
        &self,
        submission: ProjectSubmission,
    ) -> Result<InteractionOutcome, ApplicationError> {
        let correlation_id = submission.correlation_id().to_owned();
        let created_by = submission.user_id.clone().unwrap_or_default();

        let draft = match ProjectDraft::new(&submission.name, &submission.description, created_by)
        {
            Ok(draft) => draft,
            Err(DomainError::MissingProjectName) => {
                info!(
                    event_name = "ingress.slack.project_rejected",
                    correlation_id = %correlation_id,
                    "create-project submission has no name"
                );
                let message = ApplicationError::from(DomainError::MissingProjectName).user_message();
                return Ok(InteractionOutcome::ack_only(Acknowledgment::View(
                    ViewResponse::field_error(NAME_BLOCK_ID, message),
                )));
            }
            Err(other) => return Err(other.into()),
        };

        let project = self
            .projects
            .create(draft)
            .await
            .map_err(|error| ApplicationError::Persistence(error.to_string()))?;

        info!(
            event_name = "domain.project.created",
            correlation_id = %correlation_id,
            project_id = %project.id,
            created_by = %project.created_by,
            "project created"
        );

        Ok(InteractionOutcome {
            ack: Acknowledgment::View(ViewResponse::Clear),
            follow_up: Some(ProjectNotification {
                project,
                recipient: submission.user_id,
                correlation_id,
            }),
        })
    }

    /// Sends the confirmation to the creator and to the projects channel.
    /// The two deliveries run concurrently and fail independently.
    pub async fn complete(&self, notification: ProjectNotification) -> NotificationReport {
        let text = project_created_text(&notification.project);
        let correlation_id = notification.correlation_id.as_str();

        let direct_message = async {
            let Some(user_id) = notification.recipient.as_deref() else {
                warn!(
                    event_name = "egress.slack.direct_message_skipped",
                    correlation_id = %correlation_id,
                    project_id = %notification.project.id,
                    "submission carried no user id; skipping direct message"
                );
                return Delivery::Skipped;
            };
            let sent = async {
                let channel = self.api.open_direct_message(user_id).await?;
                self.api.post_message(&channel, &text).await
            };
            delivery("direct_message", correlation_id, sent.await)
        };

        let announcement = async {
            let sent = self.api.post_message(&self.projects_channel, &text).await;
            delivery("announcement", correlation_id, sent)
        };

        let (direct_message, announcement) = tokio::join!(direct_message, announcement);
        NotificationReport { direct_message, announcement }
    }
}

fn delivery(kind: &'static str, correlation_id: &str, result: Result<Value, ApiError>) -> Delivery {
    match result {
        Ok(_) => {
            info!(
                event_name = "egress.slack.notification_sent",
                correlation_id = %correlation_id,
                kind,
                "project notification delivered"
            );
            Delivery::Delivered
        }
        Err(api_error) => {
            error!(
                event_name = "egress.slack.notification_failed",
                correlation_id = %correlation_id,
                kind,
                method = api_error.method(),
                error_code = api_error.code().unwrap_or_default(),
                body = ?api_error.body(),
                error = %api_error,
                "project notification failed"
            );
            Delivery::Failed(api_error.to_string())
        }
    }
}
