//! Moves the finished task file into `completed/`.

use std::path::Path;

use tracing::{info, instrument};

use crate::error::AgentError;
use crate::ports::{FileSystem, GitRepo};
use crate::task::{archived_path, completed_dir, task_path};

/// Moves the branch's task file into the completed directory, commits the
/// move and pushes.
///
/// When the task file is already archived the move and commit are skipped
/// and only the push runs.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a git step fails.
#[instrument(skip_all, fields(%branch))]
pub fn archive_task(
    fs: &dyn FileSystem,
    git: &dyn GitRepo,
    tasks_dir: &Path,
    branch: &str,
    issue_key: &str,
    remote: &str,
) -> Result<(), AgentError> {
    let active = task_path(tasks_dir, branch);
    let archived = archived_path(tasks_dir, branch);

    if !fs.exists(&active) && fs.exists(&archived) {
        info!(path = %archived.display(), "Task file already archived");
    } else {
        info!(from = %active.display(), to = %archived.display(), "Archiving task file");
        let dir = completed_dir(tasks_dir);
        fs.create_dir_all(&dir)
            .map_err(|e| AgentError::io(format!("creating {}", dir.display()), e))?;
        git.mv(&active, &archived).map_err(|e| AgentError::git("mv", e))?;
        git.commit(&format!("chore: Archive task file for {issue_key}"))
            .map_err(|e| AgentError::git("commit", e))?;
    }

    git.push(remote, branch).map_err(|e| AgentError::git("push", e))
}
