use std::process::ExitCode;

fn main() -> ExitCode {
    projector_cli::run()
}
