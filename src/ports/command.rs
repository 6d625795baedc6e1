//! Command runner port for executing validation commands.

use serde::{Deserialize, Serialize};

/// The output of a finished process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    /// The exit code of the process (`-1` when terminated by a signal).
    pub exit_code: i32,
    /// The captured standard output.
    pub stdout: String,
    /// The captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Returns `true` when the process exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes programs from an argument vector, without a shell.
pub trait CommandRunner: Send + Sync {
    /// Runs `argv[0]` with the remaining elements as arguments and captures
    /// its output. A non-zero exit is reported in [`CommandOutput`], not as
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns an error if `argv` is empty or the program cannot be spawned.
    fn run(&self, argv: &[String])
        -> Result<CommandOutput, Box<dyn std::error::Error + Send + Sync>>;
}
