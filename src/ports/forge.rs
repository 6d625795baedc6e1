//! Pull request host port.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// Boxed future returned by [`PullRequestHost::create_pull_request`].
pub type PullRequestFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// A pull request to open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Pull request title.
    pub title: String,
    /// Pull request description.
    pub body: String,
    /// Branch holding the changes.
    pub head: String,
    /// Branch the changes should merge into.
    pub base: String,
}

/// Opens pull requests on a source-hosting service.
pub trait PullRequestHost: Send + Sync {
    /// Opens `pull` against `repo` (`owner/name`) and returns its web URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the host does not answer
    /// with a created pull request.
    fn create_pull_request<'a>(&'a self, repo: &'a str, pull: &'a PullRequest)
        -> PullRequestFuture<'a>;
}
