//! Recording adapter for the `PullRequestHost` port.

use serde_json::json;

use super::record_result;
use crate::cassette::session::SharedRecorder;
use crate::ports::{PullRequest, PullRequestFuture, PullRequestHost};

/// Records pull request creation while delegating to an inner host.
pub struct RecordingPullRequestHost {
    inner: Box<dyn PullRequestHost>,
    recorder: SharedRecorder,
}

impl RecordingPullRequestHost {
    /// Creates a new recording host wrapping the given implementation.
    pub fn new(inner: Box<dyn PullRequestHost>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

impl PullRequestHost for RecordingPullRequestHost {
    fn create_pull_request<'a>(
        &'a self,
        repo: &'a str,
        pull: &'a PullRequest,
    ) -> PullRequestFuture<'a> {
        Box::pin(async move {
            let result = self.inner.create_pull_request(repo, pull).await;
            let input = json!({ "repo": repo, "pull": pull });
            record_result(&self.recorder, "forge", "create_pull_request", &input, &result);
            result
        })
    }
}
