use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use secrecy::SecretString;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::client::{ApiError, SlackApi};
use crate::signature::SignatureVerifier;

pub const SIGNING_SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";

pub fn verifier() -> SignatureVerifier {
    SignatureVerifier::new(SecretString::from(SIGNING_SECRET.to_string()))
}

/// Timestamp and signature for `body`, signed now.
pub fn signed(body: &str) -> (String, String) {
    let timestamp = Utc::now().timestamp().to_string();
    let signature = verifier().sign(&timestamp, body.as_bytes()).expect("sign");
    (timestamp, signature)
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub payload: Value,
}

/// `SlackApi` fake that records every call and answers from a script.
#[derive(Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<RecordedCall>>,
    failures: HashMap<String, String>,
}

impl RecordingApi {
    /// Makes every call to `method` fail with the platform error `code`.
    pub fn failing(mut self, method: &str, code: &str) -> Self {
        self.failures.insert(method.to_owned(), code.to_owned());
        self
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    pub async fn methods(&self) -> Vec<String> {
        self.calls.lock().await.iter().map(|call| call.method.clone()).collect()
    }
}

#[async_trait]
impl SlackApi for RecordingApi {
    async fn call(&self, method: &str, payload: Value) -> Result<Value, ApiError> {
        self.calls.lock().await.push(RecordedCall { method: method.to_owned(), payload });

        if let Some(code) = self.failures.get(method) {
            return Err(ApiError::Platform {
                method: method.to_owned(),
                code: code.clone(),
                body: json!({ "ok": false, "error": code }),
            });
        }

        match method {
            "conversations.open" => Ok(json!({ "ok": true, "channel": { "id": "D0DIRECT" } })),
            _ => Ok(json!({ "ok": true })),
        }
    }
}
