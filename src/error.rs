//! Error type shared by every pipeline stage.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by port implementations.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a single agent run.
///
/// Port errors are mapped into one of these variants at the stage boundary so
/// the top level can log and report a single message.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The task file for the branch does not exist.
    #[error("task file not found: {}", path.display())]
    TaskFileMissing {
        /// Path that was looked up, relative to the workspace root.
        path: PathBuf,
    },

    /// The task file exists but does not follow the header/body layout.
    #[error("malformed task file {}: {reason}", path.display())]
    TaskFormat {
        /// Path of the offending task file.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// The language model call failed.
    #[error("model request failed: {0}")]
    Llm(String),

    /// The model answered with something that is not a change plan.
    #[error("could not parse change plan: {0}")]
    PlanParse(String),

    /// A planned file path points outside the workspace root.
    #[error("refusing to write outside the workspace: {path}")]
    PathOutsideWorkspace {
        /// Path exactly as the model supplied it.
        path: String,
    },

    /// Local filesystem access failed.
    #[error("{context}: {source}")]
    Io {
        /// What was being attempted.
        context: String,
        /// Underlying port error.
        source: PortError,
    },

    /// A validation command exited unsuccessfully.
    #[error("command `{command}` failed with exit code {exit_code}\nstdout:\n{stdout}\nstderr:\n{stderr}")]
    CommandFailed {
        /// Command line, space-joined.
        command: String,
        /// Exit code reported by the process (`-1` when killed by a signal).
        exit_code: i32,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
    },

    /// A git invocation failed.
    #[error("git {operation} failed: {source}")]
    Git {
        /// Short name of the git operation (`commit`, `push`, ...).
        operation: &'static str,
        /// Underlying port error, carrying git's captured output.
        source: PortError,
    },

    /// The remote URL is not a GitHub repository URL.
    #[error("could not parse repository owner/name from remote URL: {0}")]
    UnrecognizedRemote(String),

    /// The pull request could not be created.
    #[error("failed to create pull request: {0}")]
    PullRequest(String),

    /// Configuration or adapter setup failed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl AgentError {
    /// Wraps a filesystem port error with context.
    pub fn io(context: impl Into<String>, source: PortError) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Wraps a git port error with the operation name.
    #[must_use]
    pub fn git(operation: &'static str, source: PortError) -> Self {
        Self::Git { operation, source }
    }
}
