use projector_core::config::{AppConfig, ConfigError, LoadOptions};
use secrecy::ExposeSecret;
use serde::Serialize;

use super::CommandResult;

const SIGNING_SECRET_LEN: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report(AppConfig::load(LoadOptions::default()));
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report(loaded: Result<AppConfig, ConfigError>) -> DoctorReport {
    let mut checks = Vec::new();

    match loaded {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_signing_secret(&config));
            checks.push(check_projects_channel(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["slack_signing_secret", "slack_projects_channel"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

/// Slack issues signing secrets as 32 lowercase hex characters.
fn check_signing_secret(config: &AppConfig) -> DoctorCheck {
    let secret = config.slack.signing_secret.expose_secret().trim();
    let well_formed = secret.len() == SIGNING_SECRET_LEN
        && secret.chars().all(|ch| ch.is_ascii_hexdigit() && !ch.is_ascii_uppercase());

    if well_formed {
        DoctorCheck {
            name: "slack_signing_secret",
            status: CheckStatus::Pass,
            details: "signing secret has the expected shape".to_string(),
        }
    } else {
        DoctorCheck {
            name: "slack_signing_secret",
            status: CheckStatus::Fail,
            details: format!(
                "signing secret should be {SIGNING_SECRET_LEN} lowercase hex characters; copy it from Basic Information > App Credentials"
            ),
        }
    }
}

fn check_projects_channel(config: &AppConfig) -> DoctorCheck {
    let channel = config.slack.projects_channel.trim();
    let looks_valid = channel.starts_with('#')
        || (channel.len() > 1
            && (channel.starts_with('C') || channel.starts_with('G'))
            && channel.chars().all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit()));

    if looks_valid {
        DoctorCheck {
            name: "slack_projects_channel",
            status: CheckStatus::Pass,
            details: format!("announcements go to `{channel}`"),
        }
    } else {
        DoctorCheck {
            name: "slack_projects_channel",
            status: CheckStatus::Fail,
            details: format!("`{channel}` is neither a #channel name nor a channel id"),
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use projector_core::config::{AppConfig, ConfigError};

    use super::{build_report, render_human, CheckStatus};

    fn config(secret: &str, channel: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.slack.bot_token = "xoxb-test".to_string().into();
        config.slack.signing_secret = secret.to_string().into();
        config.slack.projects_channel = channel.to_string();
        config
    }

    #[test]
    fn well_formed_config_passes_every_check() {
        let report = build_report(Ok(config("8f742231b10e8888abcd99aa6b5f85a5", "#mvp-log")));

        assert_eq!(report.overall_status, CheckStatus::Pass);
        assert!(report.checks.iter().all(|check| check.status == CheckStatus::Pass));
        assert_eq!(report.checks.len(), 3);
    }

    #[test]
    fn channel_ids_are_accepted() {
        let report = build_report(Ok(config("8f742231b10e8888abcd99aa6b5f85a5", "C024BE91L")));

        assert_eq!(report.overall_status, CheckStatus::Pass);
    }

    #[test]
    fn malformed_secret_and_channel_fail() {
        let report = build_report(Ok(config("not-a-secret", "mvp log")));

        assert_eq!(report.overall_status, CheckStatus::Fail);
        let statuses: Vec<(&str, CheckStatus)> =
            report.checks.iter().map(|check| (check.name, check.status)).collect();
        assert_eq!(
            statuses,
            vec![
                ("config_validation", CheckStatus::Pass),
                ("slack_signing_secret", CheckStatus::Fail),
                ("slack_projects_channel", CheckStatus::Fail),
            ]
        );
    }

    #[test]
    fn config_failure_skips_dependent_checks() {
        let report = build_report(Err(ConfigError::Validation("slack.bot_token is required".into())));

        assert_eq!(report.overall_status, CheckStatus::Fail);
        assert_eq!(report.checks[0].status, CheckStatus::Fail);
        assert!(report.checks[1..].iter().all(|check| check.status == CheckStatus::Skipped));

        let rendered = render_human(&report);
        assert!(rendered.starts_with("doctor: one or more readiness checks failed"));
        assert!(rendered.contains("- [fail] config_validation: configuration validation failed: slack.bot_token is required"));
        assert!(rendered.contains("- [skip] slack_signing_secret"));
    }

    #[test]
    fn report_serializes_with_snake_case_statuses() {
        let report = build_report(Ok(config("8f742231b10e8888abcd99aa6b5f85a5", "#mvp-log")));

        let json = serde_json::to_value(&report).expect("serialize");

        assert_eq!(json["overall_status"], "pass");
        assert_eq!(json["checks"][1]["name"], "slack_signing_secret");
    }
}
