use chrono::Utc;
use projector_core::config::{AppConfig, LoadOptions};
use projector_slack::signature::{SignatureError, SignatureVerifier, SIGNATURE_HEADER, TIMESTAMP_HEADER};

use super::CommandResult;

pub fn run(body: &str, timestamp: Option<i64>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("sign", "config_validation", error.to_string(), 2)
        }
    };

    let verifier = SignatureVerifier::new(config.slack.signing_secret);
    let timestamp = timestamp.unwrap_or_else(|| Utc::now().timestamp());
    match render_headers(&verifier, timestamp, body) {
        Ok(output) => CommandResult { exit_code: 0, output },
        Err(error) => CommandResult::failure("sign", "signature", error.to_string(), 3),
    }
}

/// Header lines ready to paste after `curl -H`.
fn render_headers(
    verifier: &SignatureVerifier,
    timestamp: i64,
    body: &str,
) -> Result<String, SignatureError> {
    let timestamp = timestamp.to_string();
    let signature = verifier.sign(&timestamp, body.as_bytes())?;
    Ok(format!("{TIMESTAMP_HEADER}: {timestamp}\n{SIGNATURE_HEADER}: {signature}"))
}
