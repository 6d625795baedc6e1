//! Git repository port for version-control operations.

use std::path::Path;

/// Provides the git operations the agent performs on its working copy.
///
/// Every method blocks until git exits. Errors carry git's captured output.
pub trait GitRepo: Send + Sync {
    /// Stages a path (`git add`).
    ///
    /// # Errors
    ///
    /// Returns an error if git rejects the path.
    fn add(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Creates a commit from the index (`git commit -m`).
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails, including when nothing is staged.
    fn commit(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Returns `git status --porcelain` output verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the status cannot be computed.
    fn status_porcelain(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

    /// Moves a tracked file (`git mv`).
    ///
    /// # Errors
    ///
    /// Returns an error if the source is untracked or the move fails.
    fn mv(&self, from: &Path, to: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Pushes `branch` to `remote`.
    ///
    /// # Errors
    ///
    /// Returns an error if the push is rejected or the remote is unreachable.
    fn push(&self, remote: &str, branch: &str)
        -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Returns the fetch URL configured for `remote`, trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote does not exist.
    fn remote_url(&self, remote: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}
