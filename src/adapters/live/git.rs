//! Live git adapter using `git` CLI commands.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::ports::git::GitRepo;

/// Live git adapter that shells out to the `git` CLI inside the workspace.
pub struct LiveGitRepo {
    workdir: PathBuf,
}

impl LiveGitRepo {
    /// Creates an adapter running git in `workdir`.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self { workdir: workdir.into() }
    }

    fn git(&self, args: &[&str]) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        info!("Executing: git {}", args.join(" "));
        let output = Command::new("git").args(args).current_dir(&self.workdir).output()?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "`git {}` exited with {}\nstdout:\n{stdout}\nstderr:\n{stderr}",
                args.join(" "),
                output.status.code().unwrap_or(-1),
            )
            .into());
        }
        debug!(stdout = %stdout, "git finished");
        Ok(stdout)
    }
}

fn path_arg(path: &Path) -> Result<&str, Box<dyn std::error::Error + Send + Sync>> {
    path.to_str().ok_or_else(|| format!("path is not valid UTF-8: {}", path.display()).into())
}

impl GitRepo for LiveGitRepo {
    fn add(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.git(&["add", path_arg(path)?]).map(drop)
    }

    fn commit(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.git(&["commit", "-m", message]).map(drop)
    }

    fn status_porcelain(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.git(&["status", "--porcelain"])
    }

    fn mv(&self, from: &Path, to: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.git(&["mv", path_arg(from)?, path_arg(to)?]).map(drop)
    }

    fn push(
        &self,
        remote: &str,
        branch: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.git(&["push", remote, branch]).map(drop)
    }

    fn remote_url(&self, remote: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.git(&["remote", "get-url", remote])?.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let git = |args: &[&str]| {
            let status = Command::new("git").args(args).current_dir(dir.path()).status().unwrap();
            assert!(status.success(), "git {args:?} failed");
        };
        git(&["init", "-q"]);
        git(&["config", "user.email", "agent@example.com"]);
        git(&["config", "user.name", "Agent"]);
        git(&["config", "commit.gpgsign", "false"]);
        dir
    }

    #[test]
    fn add_commit_and_status_round_trip() {
        let dir = init_repo();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        let git = LiveGitRepo::new(dir.path());

        assert!(git.status_porcelain().unwrap().contains("a.txt"));
        git.add(Path::new("a.txt")).unwrap();
        git.commit("add a").unwrap();

        assert!(git.status_porcelain().unwrap().is_empty());
    }

    #[test]
    fn mv_moves_tracked_file() {
        let dir = init_repo();
        std::fs::write(dir.path().join("task.md"), "t").unwrap();
        std::fs::create_dir_all(dir.path().join("done")).unwrap();
        let git = LiveGitRepo::new(dir.path());
        git.add(Path::new("task.md")).unwrap();
        git.commit("task").unwrap();

        git.mv(Path::new("task.md"), Path::new("done/task.md")).unwrap();

        assert!(dir.path().join("done/task.md").exists());
        assert!(!dir.path().join("task.md").exists());
    }

    #[test]
    fn remote_url_is_trimmed() {
        let dir = init_repo();
        let status = Command::new("git")
            .args(["remote", "add", "origin", "git@github.com:acme/widgets.git"])
            .current_dir(dir.path())
            .status()
            .unwrap();
        assert!(status.success());

        let git = LiveGitRepo::new(dir.path());
        assert_eq!(git.remote_url("origin").unwrap(), "git@github.com:acme/widgets.git");
    }

    #[test]
    fn failure_carries_captured_output() {
        let dir = init_repo();
        let git = LiveGitRepo::new(dir.path());

        let err = git.commit("nothing staged").unwrap_err().to_string();

        assert!(err.contains("git commit -m nothing staged"));
        assert!(err.contains("stdout:"));
    }
}
