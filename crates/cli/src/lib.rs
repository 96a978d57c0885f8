pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "projector",
    about = "Projector operator CLI",
    long_about = "Inspect projector configuration, check Slack credential readiness, and sign local webhook requests.",
    after_help = "Examples:\n  projector doctor --json\n  projector config\n  projector sign --body 'command=%2Fcreate-project&trigger_id=1.2.3'"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config and Slack credential shape")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Print signature headers for a raw request body using the configured secret")]
    Sign {
        #[arg(long, help = "Raw request body exactly as it will be sent")]
        body: String,
        #[arg(long, help = "Unix timestamp to sign with (defaults to now)")]
        timestamp: Option<i64>,
    },
}

pub fn run() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Sign { body, timestamp } => commands::sign::run(&body, timestamp),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
