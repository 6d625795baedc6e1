//! Replaying adapter for the `PullRequestHost` port.

use super::{next_output, replay_result};
use crate::cassette::replayer::SharedReplayer;
use crate::ports::{PullRequest, PullRequestFuture, PullRequestHost};

/// Serves recorded pull request URLs from a cassette.
pub struct ReplayingPullRequestHost {
    replayer: SharedReplayer,
}

impl ReplayingPullRequestHost {
    /// Create a replaying host backed by the given replayer.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer }
    }
}

impl PullRequestHost for ReplayingPullRequestHost {
    fn create_pull_request<'a>(
        &'a self,
        _repo: &'a str,
        _pull: &'a PullRequest,
    ) -> PullRequestFuture<'a> {
        let output = next_output(Some(&self.replayer), "forge", "create_pull_request");
        Box::pin(async move { replay_result::<String>(output) })
    }
}
