//! Core library entry for the `taskpilot` CLI.

pub mod adapters;
pub mod app;
pub mod cassette;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod plan;
pub mod ports;
pub mod task;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing, configuration or the
/// agent run fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // --help and --version
        Err(err) if !err.use_stderr() => {
            err.print().map_err(|e| e.to_string())?;
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    let config = config::Config::from_env(&cli).map_err(|e| e.to_string())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start async runtime: {e}"))?;
    runtime.block_on(app::dispatch(&config))
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_without_branch() {
        let result = run(["taskpilot"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_prints_help() {
        assert!(run(["taskpilot", "--help"]).is_ok());
    }

    #[test]
    fn run_errors_on_unknown_flag() {
        let err = run(["taskpilot", "b", "--frobnicate"]).unwrap_err();
        assert!(err.contains("--frobnicate"));
    }
}
