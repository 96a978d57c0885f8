use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use projector_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    render(&config, config_file_doc.as_ref(), config_file_path.as_deref())
}

fn render(config: &AppConfig, file_doc: Option<&Value>, file_path: Option<&Path>) -> String {
    let fields: [(&str, &[&str], String); 10] = [
        (
            "slack.bot_token",
            &["PROJECTOR_SLACK_BOT_TOKEN", "SLACK_BOT_TOKEN"],
            redact_token(config.slack.bot_token.expose_secret()),
        ),
        (
            "slack.signing_secret",
            &["PROJECTOR_SLACK_SIGNING_SECRET", "SLACK_SIGNING_SECRET"],
            redact_secret(config.slack.signing_secret.expose_secret()),
        ),
        (
            "slack.projects_channel",
            &["PROJECTOR_SLACK_PROJECTS_CHANNEL", "SLACK_PROJECTS_CHANNEL"],
            config.slack.projects_channel.clone(),
        ),
        ("slack.api_base_url", &["PROJECTOR_SLACK_API_BASE_URL"], config.slack.api_base_url.clone()),
        (
            "slack.api_timeout_secs",
            &["PROJECTOR_SLACK_API_TIMEOUT_SECS"],
            config.slack.api_timeout_secs.to_string(),
        ),
        (
            "server.bind_address",
            &["PROJECTOR_SERVER_BIND_ADDRESS"],
            config.server.bind_address.clone(),
        ),
        ("server.port", &["PROJECTOR_SERVER_PORT", "PORT"], config.server.port.to_string()),
        (
            "server.graceful_shutdown_secs",
            &["PROJECTOR_SERVER_GRACEFUL_SHUTDOWN_SECS"],
            config.server.graceful_shutdown_secs.to_string(),
        ),
        (
            "logging.level",
            &["PROJECTOR_LOGGING_LEVEL", "PROJECTOR_LOG_LEVEL"],
            config.logging.level.clone(),
        ),
        (
            "logging.format",
            &["PROJECTOR_LOGGING_FORMAT", "PROJECTOR_LOG_FORMAT"],
            format!("{:?}", config.logging.format),
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key_path, env_keys, value) in fields {
        lines.push(render_line(key_path, &value, field_source(key_path, env_keys, file_doc, file_path)));
    }

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("projector.toml"), PathBuf::from("config/projector.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

/// First env key that is set wins, in the same order the loader reads them.
fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| {
        env::var(key).map(|value| !value.trim().is_empty()).unwrap_or(false)
    }) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }

    "<redacted>".to_string()
}

fn redact_secret(secret: &str) -> String {
    if secret.trim().is_empty() {
        "<empty>".to_string()
    } else {
        "<redacted>".to_string()
    }
}
