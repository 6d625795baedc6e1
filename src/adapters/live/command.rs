//! Live command runner using `std::process::Command`.

use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, info};

use crate::ports::command::{CommandOutput, CommandRunner};

/// Live runner that spawns programs directly in the workspace.
pub struct LiveCommandRunner {
    workdir: PathBuf,
}

impl LiveCommandRunner {
    /// Creates a runner whose processes start in `workdir`.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self { workdir: workdir.into() }
    }
}

impl CommandRunner for LiveCommandRunner {
    fn run(
        &self,
        argv: &[String],
    ) -> Result<CommandOutput, Box<dyn std::error::Error + Send + Sync>> {
        let (program, args) = argv.split_first().ok_or("cannot run an empty command")?;
        info!("Executing: {}", argv.join(" "));
        let output = Command::new(program).args(args).current_dir(&self.workdir).output()?;
        let result = CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(exit_code = result.exit_code, stdout = %result.stdout, "command finished");
        Ok(result)
    }
}
