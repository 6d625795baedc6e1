//! Runs the plan's validation commands.

use tracing::{debug, info, instrument, warn};

use crate::error::AgentError;
use crate::ports::CommandRunner;

/// Runs each command in order, stopping at the first failure.
///
/// Empty argument vectors are skipped.
///
/// # Errors
///
/// Returns [`AgentError::CommandFailed`] for the first command that cannot
/// be spawned or exits non-zero, carrying that command's captured output.
#[instrument(skip_all, fields(commands = commands.len()))]
pub fn run_validations(runner: &dyn CommandRunner, commands: &[Vec<String>]) -> Result<(), AgentError> {
    for argv in commands {
        if argv.is_empty() {
            warn!("Skipping empty validation command");
            continue;
        }
        let command = argv.join(" ");

        let output = runner.run(argv).map_err(|e| AgentError::CommandFailed {
            command: command.clone(),
            exit_code: -1,
            stdout: String::new(),
            stderr: e.to_string(),
        })?;
        debug!(%command, stdout = %output.stdout, "validation output");

        if !output.success() {
            return Err(AgentError::CommandFailed {
                command,
                exit_code: output.exit_code,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }
        info!(%command, "Validation passed");
    }
    Ok(())
}
