//! Git bookkeeping around the generated changes.

use std::path::Path;

use tracing::{info, instrument};

use crate::error::AgentError;
use crate::ports::{FileSystem, GitRepo};

/// Appends the plan explanation to the task file and commits it on its own.
///
/// # Errors
///
/// Returns an error if the append, `git add` or `git commit` fails.
#[instrument(skip_all, fields(task_file = %task_file.display()))]
pub fn log_plan(
    fs: &dyn FileSystem,
    git: &dyn GitRepo,
    task_file: &Path,
    issue_key: &str,
    explanation: &str,
) -> Result<(), AgentError> {
    info!("Updating task file with the plan");
    fs.append(task_file, &plan_section(explanation))
        .map_err(|e| AgentError::io(format!("appending to {}", task_file.display()), e))?;
    git.add(task_file).map_err(|e| AgentError::git("add", e))?;
    git.commit(&format!("docs: Log AI plan for {issue_key}"))
        .map_err(|e| AgentError::git("commit", e))
}

fn plan_section(explanation: &str) -> String {
    format!("\n\n---\n\n**AI Plan of Action:**\n{explanation}\n")
}

/// Commits pending changes with `message` if there are any, then pushes
/// `branch` to `remote`. Returns whether a commit was made.
///
/// # Errors
///
/// Returns an error if `git status`, `git commit` or `git push` fails.
#[instrument(skip_all, fields(%remote, %branch))]
pub fn commit_and_push(
    git: &dyn GitRepo,
    message: &str,
    remote: &str,
    branch: &str,
) -> Result<bool, AgentError> {
    let status = git.status_porcelain().map_err(|e| AgentError::git("status", e))?;
    let committed = if status.trim().is_empty() {
        info!("No changes to commit.");
        false
    } else {
        git.commit(message).map_err(|e| AgentError::git("commit", e))?;
        true
    };
    git.push(remote, branch).map_err(|e| AgentError::git("push", e))?;
    Ok(committed)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::adapters::live::filesystem::LiveFileSystem;
    use crate::pipeline::testing::{inputs, methods, ok, spy_git};

    #[test]
    fn log_plan_appends_section_and_commits() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("AI_TASKS")).unwrap();
        std::fs::write(dir.path().join("AI_TASKS/b.md"), "jobId: 1\n").unwrap();
        let fs = LiveFileSystem::new(dir.path());
        let git = spy_git(&[("add", ok()), ("commit", ok())]);

        log_plan(&fs, &git.port, Path::new("AI_TASKS/b.md"), "K-1", "Add a thing.").unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("AI_TASKS/b.md")).unwrap(),
            "jobId: 1\n\n\n---\n\n**AI Plan of Action:**\nAdd a thing.\n"
        );
        assert_eq!(methods(&git.calls), vec!["add", "commit"]);
        assert_eq!(inputs(&git.calls, "commit"), vec![json!({"message": "docs: Log AI plan for K-1"})]);
    }

    #[test]
    fn commits_when_status_has_changes() {
        let git = spy_git(&[
            ("status_porcelain", json!({"ok": "A  src/new.rs\n"})),
            ("commit", ok()),
            ("push", ok()),
        ]);

        let committed = commit_and_push(&git.port, "feat(K): x", "origin", "feature/K").unwrap();

        assert!(committed);
        assert_eq!(methods(&git.calls), vec!["status_porcelain", "commit", "push"]);
        assert_eq!(inputs(&git.calls, "commit"), vec![json!({"message": "feat(K): x"})]);
        assert_eq!(
            inputs(&git.calls, "push"),
            vec![json!({"remote": "origin", "branch": "feature/K"})]
        );
    }

    #[test]
    fn clean_tree_skips_commit_but_still_pushes() {
        let git = spy_git(&[("status_porcelain", json!({"ok": ""})), ("push", ok())]);

        let committed = commit_and_push(&git.port, "feat(K): x", "origin", "b").unwrap();

        assert!(!committed);
        assert_eq!(methods(&git.calls), vec!["status_porcelain", "push"]);
    }

    #[test]
    fn push_failure_is_fatal() {
        let git = spy_git(&[
            ("status_porcelain", json!({"ok": ""})),
            ("push", json!({"err": "! [rejected] (fetch first)"})),
        ]);

        let err = commit_and_push(&git.port, "m", "origin", "b").unwrap_err();

        assert!(matches!(err, AgentError::Git { operation: "push", .. }));
        assert!(err.to_string().contains("rejected"));
    }

    #[test]
    fn status_failure_is_fatal() {
        let git = spy_git(&[("status_porcelain", json!({"err": "not a git repository"}))]);

        let err = commit_and_push(&git.port, "m", "origin", "b").unwrap_err();

        assert!(matches!(err, AgentError::Git { operation: "status", .. }));
        assert!(methods(&git.calls) == vec!["status_porcelain"]);
    }
}
