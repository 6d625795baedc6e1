//! Recording adapter for the `GitRepo` port.

use std::path::Path;

use serde_json::json;

use super::record_result;
use crate::cassette::session::SharedRecorder;
use crate::ports::GitRepo;

const PORT: &str = "git";

/// Records git interactions while delegating to an inner implementation.
pub struct RecordingGitRepo {
    inner: Box<dyn GitRepo>,
    recorder: SharedRecorder,
}

impl RecordingGitRepo {
    /// Creates a new recording git repo wrapping the given implementation.
    pub fn new(inner: Box<dyn GitRepo>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

impl GitRepo for RecordingGitRepo {
    fn add(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.add(path);
        let input = json!({ "path": path.display().to_string() });
        record_result(&self.recorder, PORT, "add", &input, &result);
        result
    }

    fn commit(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.commit(message);
        record_result(&self.recorder, PORT, "commit", &json!({ "message": message }), &result);
        result
    }

    fn status_porcelain(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.status_porcelain();
        record_result(&self.recorder, PORT, "status_porcelain", &(), &result);
        result
    }

    fn mv(&self, from: &Path, to: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.mv(from, to);
        let input =
            json!({ "from": from.display().to_string(), "to": to.display().to_string() });
        record_result(&self.recorder, PORT, "mv", &input, &result);
        result
    }

    fn push(
        &self,
        remote: &str,
        branch: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.push(remote, branch);
        let input = json!({ "remote": remote, "branch": branch });
        record_result(&self.recorder, PORT, "push", &input, &result);
        result
    }

    fn remote_url(&self, remote: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.remote_url(remote);
        record_result(&self.recorder, PORT, "remote_url", &json!({ "remote": remote }), &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::adapters::live::git::LiveGitRepo;
    use crate::cassette::format::Cassette;
    use crate::cassette::recorder::CassetteRecorder;

    #[test]
    fn records_failed_commit_as_err() {
        let dir = tempfile::tempdir().unwrap();
        let cassette_path = dir.path().join("git.cassette.yaml");
        let recorder =
            Arc::new(Mutex::new(CassetteRecorder::new(&cassette_path, "test", "abc")));

        {
            // Not a repository: every git call fails.
            let git = RecordingGitRepo::new(
                Box::new(LiveGitRepo::new(dir.path())),
                Arc::clone(&recorder),
            );
            assert!(git.commit("docs: Log AI plan for ABC-1").is_err());
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let cassette = Cassette::load(&cassette_path).unwrap();
        let interaction = &cassette.interactions[0];
        assert_eq!(interaction.port, "git");
        assert_eq!(interaction.method, "commit");
        assert_eq!(interaction.input["message"], "docs: Log AI plan for ABC-1");
        assert!(interaction.output.get("err").is_some());
    }
}
