//! CLI argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI parser for `taskpilot`.
#[derive(Debug, Parser)]
#[command(
    name = "taskpilot",
    version,
    about = "Run the AI agent task attached to a branch: plan, apply, validate, push, open a PR"
)]
pub struct Cli {
    /// Branch whose task file should be executed (e.g. `feature/ABC-123`).
    pub branch: String,

    /// Directory holding task files, relative to the workspace root.
    #[arg(long, default_value = "AI_TASKS")]
    pub tasks_dir: PathBuf,

    /// Repository root the agent works in.
    #[arg(long, default_value = ".")]
    pub workdir: PathBuf,

    /// Git remote to push to and derive the GitHub repository from.
    #[arg(long, default_value = "origin")]
    pub remote: String,

    /// Gemini model id; overrides `GEMINI_MODEL`.
    #[arg(long)]
    pub model: Option<String>,
}
