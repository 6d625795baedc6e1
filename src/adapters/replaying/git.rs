//! Replaying adapter for the `GitRepo` port.

use std::path::Path;

use super::{next_output, replay_result};
use crate::cassette::replayer::SharedReplayer;
use crate::ports::GitRepo;

const PORT: &str = "git";

/// Replays recorded git operations from a cassette.
pub struct ReplayingGitRepo {
    replayer: Option<SharedReplayer>,
}

impl ReplayingGitRepo {
    /// Create a replaying git repo backed by the given replayer.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer: Some(replayer) }
    }

    /// Create a replaying git repo with no cassette. Panics when called.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }

    fn replay<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
    ) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
        replay_result(next_output(self.replayer.as_ref(), PORT, method))
    }
}

impl GitRepo for ReplayingGitRepo {
    fn add(&self, _path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.replay("add")
    }

    fn commit(&self, _message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.replay("commit")
    }

    fn status_porcelain(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.replay("status_porcelain")
    }

    fn mv(&self, _from: &Path, _to: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.replay("mv")
    }

    fn push(
        &self,
        _remote: &str,
        _branch: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.replay("push")
    }

    fn remote_url(&self, _remote: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.replay("remote_url")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use crate::cassette::replayer::CassetteReplayer;
    use chrono::Utc;
    use serde_json::json;

    fn make_replayer(interactions: Vec<Interaction>) -> SharedReplayer {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        };
        CassetteReplayer::new(&cassette).shared()
    }

    #[test]
    fn replays_remote_url_and_push_failure() {
        let git = ReplayingGitRepo::new(make_replayer(vec![
            Interaction {
                seq: 0,
                port: "git".into(),
                method: "remote_url".into(),
                input: json!({"remote": "origin"}),
                output: json!({"ok": "https://github.com/acme/widgets"}),
            },
            Interaction {
                seq: 1,
                port: "git".into(),
                method: "push".into(),
                input: json!({"remote": "origin", "branch": "feature/x"}),
                output: json!({"err": "! [rejected] feature/x (fetch first)"}),
            },
        ]));

        assert_eq!(git.remote_url("origin").unwrap(), "https://github.com/acme/widgets");
        let err = git.push("origin", "feature/x").unwrap_err();
        assert!(err.to_string().contains("rejected"));
    }

    #[test]
    #[should_panic(expected = "no cassette loaded")]
    fn unconfigured_panics() {
        let _ = ReplayingGitRepo::unconfigured().status_porcelain();
    }
}
