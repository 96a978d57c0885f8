use std::collections::BTreeMap;

use serde::Serialize;

pub const INVALID_SIGNATURE_BODY: &str = "invalid signature";
pub const INVALID_PAYLOAD_BODY: &str = "invalid payload";

/// The synchronous answer to a webhook. It is decided before any outbound
/// call is made and is written back while the platform is still waiting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Acknowledgment {
    /// Signature check failed; nothing else was looked at.
    Rejected,
    /// Request could not be decoded after it was authenticated.
    InvalidPayload,
    /// Plain-text 200.
    Text(&'static str),
    /// JSON 200 steering the open modal.
    View(ViewResponse),
}

impl Acknowledgment {
    pub fn ok() -> Self {
        Self::Text("ok")
    }

    pub fn empty() -> Self {
        Self::Text("")
    }
}

/// `response_action` bodies for `view_submission` interactions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "response_action", rename_all = "snake_case")]
pub enum ViewResponse {
    Errors { errors: BTreeMap<String, String> },
    Clear,
}

impl ViewResponse {
    pub fn field_error(block_id: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(block_id.into(), message.into());
        Self::Errors { errors }
    }
}
