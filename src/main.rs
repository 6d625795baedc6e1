//! Binary entrypoint for the `taskpilot` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    taskpilot::logging::init();

    // Recording and replay are selected in app::dispatch via TASKPILOT_RECORD / TASKPILOT_REPLAY.
    match taskpilot::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
