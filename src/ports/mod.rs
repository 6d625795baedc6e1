//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the pipeline and an external
//! system (filesystem, git, validation commands, LLM, pull request host,
//! completion callback). Implementations live in `src/adapters/`.

pub mod command;
pub mod filesystem;
pub mod forge;
pub mod git;
pub mod llm;
pub mod notifier;

pub use command::{CommandOutput, CommandRunner};
pub use filesystem::FileSystem;
pub use forge::{PullRequest, PullRequestFuture, PullRequestHost};
pub use git::GitRepo;
pub use llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};
pub use notifier::{CompletionNotifier, CompletionSignal, JobStatus, NotifyFuture};
