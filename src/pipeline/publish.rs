//! Opens the pull request for the pushed branch.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, instrument, warn};

use crate::error::AgentError;
use crate::ports::{GitRepo, PullRequest, PullRequestHost};
use crate::task::TaskDescriptor;

static GITHUB_REMOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"github\.com[/:](.+?/.+?)(?:\.git)?$").expect("remote pattern compiles")
});

/// Extracts `owner/repo` from an SSH or HTTPS GitHub remote URL.
#[must_use]
pub fn repo_slug(remote_url: &str) -> Option<String> {
    GITHUB_REMOTE_RE
        .captures(remote_url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// The pull request opened for `task` from `branch`.
#[must_use]
pub fn pull_request_for(task: &TaskDescriptor, branch: &str) -> PullRequest {
    PullRequest {
        title: format!("feat({}): {}", task.issue_key, task.summary),
        body: format!("This PR addresses Jira ticket {}.", task.issue_key),
        head: branch.to_string(),
        base: task.parent_branch.clone(),
    }
}

/// Opens a pull request from `branch` into the task's parent branch.
///
/// Returns `Ok(None)` without touching git when no host is configured.
///
/// # Errors
///
/// Returns [`AgentError::UnrecognizedRemote`] if the remote is not a GitHub
/// URL and [`AgentError::PullRequest`] if the host rejects the request.
#[instrument(skip_all, fields(%remote, %branch))]
pub async fn open_pull_request(
    host: Option<&dyn PullRequestHost>,
    git: &dyn GitRepo,
    remote: &str,
    task: &TaskDescriptor,
    branch: &str,
) -> Result<Option<String>, AgentError> {
    let Some(host) = host else {
        warn!("GITHUB_TOKEN not found. Skipping PR creation.");
        return Ok(None);
    };

    let url = git.remote_url(remote).map_err(|e| AgentError::git("remote get-url", e))?;
    let repo = repo_slug(&url).ok_or_else(|| AgentError::UnrecognizedRemote(url.clone()))?;
    let pull = pull_request_for(task, branch);

    info!(%repo, head = %pull.head, base = %pull.base, "Creating pull request");
    let html_url = host
        .create_pull_request(&repo, &pull)
        .await
        .map_err(|e| AgentError::PullRequest(e.to_string()))?;
    info!(url = %html_url, "Pull request created");
    Ok(Some(html_url))
}
