//! Slack Integration - HTTP webhook interface
//!
//! This crate provides the Slack side of projector:
//! - **Signatures** (`signature`) - `v0` request signing checks with a replay window
//! - **Web API** (`client`) - `SlackApi` trait and the reqwest-backed `SlackWebClient`
//! - **Slash Commands** (`commands`) - `/create-project` opens the project modal
//! - **Interactions** (`interactions`) - modal submissions create and announce projects
//! - **Block Kit** (`blocks`) - modal builder and confirmation text
//!
//! # Getting Started
//!
//! 1. Create a Slack app at https://api.slack.com/apps
//! 2. Point the `/create-project` slash command at `/slack/commands`
//! 3. Enable interactivity with the request URL `/slack/interactions`
//! 4. Set env vars: `SLACK_BOT_TOKEN`, `SLACK_SIGNING_SECRET`
//!
//! # Architecture
//!
//! ```text
//! Slack → HTTP route → Dispatcher → Acknowledgment → HTTP response
//!                          ↓
//!                      follow-up (detached) → SlackApi → Slack
//! ```
//!
//! # Key Types
//!
//! - `SignatureVerifier` - Authenticates raw webhook bodies
//! - `CommandDispatcher` - Acknowledges slash commands and schedules the modal
//! - `InteractionDispatcher` - Validates submissions and schedules notifications
//! - `ModalBuilder` - Constructs modal views

pub mod ack;
pub mod blocks;
pub mod client;
pub mod commands;
pub mod form;
pub mod interactions;
pub mod signature;

#[cfg(test)]
pub(crate) mod test_support;

pub use ack::{Acknowledgment, ViewResponse};
pub use client::{ApiError, SlackApi, SlackWebClient};
pub use commands::{CommandDispatcher, CommandOutcome, OpenModal};
pub use interactions::{
    InteractionDispatcher, InteractionOutcome, NotificationReport, ProjectNotification,
};
pub use signature::{SignatureHeaders, SignatureVerifier, SIGNATURE_HEADER, TIMESTAMP_HEADER};
