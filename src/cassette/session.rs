//! Recording session managing per-port cassette recorders.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::warn;

use super::recorder::CassetteRecorder;

/// Recorder handle shared by a recording adapter and its session.
pub type SharedRecorder = Arc<Mutex<CassetteRecorder>>;

/// Per-port recorders for one run, all writing into a timestamped directory.
pub struct RecordingSession {
    /// Recorder for git interactions.
    pub git: SharedRecorder,
    /// Recorder for validation command interactions.
    pub commands: SharedRecorder,
    /// Recorder for LLM interactions.
    pub llm: SharedRecorder,
    /// Recorder for pull request host interactions.
    pub forge: SharedRecorder,
    /// Recorder for completion notifier interactions.
    pub notifier: SharedRecorder,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Creates `<root>/<timestamp>/` and one recorder per port inside it.
    ///
    /// `workdir` is the repository whose HEAD commit is stamped on each cassette.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory already exists or cannot be created.
    pub fn new(root: &Path, workdir: &Path) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let output_dir = root.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("Cassette directory already exists: {}", output_dir.display()));
        }
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let commit = head_commit(workdir);
        let make_recorder = |port: &str| -> SharedRecorder {
            let path = output_dir.join(format!("{port}.cassette.yaml"));
            Arc::new(Mutex::new(CassetteRecorder::new(path, format!("{timestamp}-{port}"), &commit)))
        };

        Ok(Self {
            git: make_recorder("git"),
            commands: make_recorder("commands"),
            llm: make_recorder("llm"),
            forge: make_recorder("forge"),
            notifier: make_recorder("notifier"),
            output_dir,
        })
    }

    /// Directory the cassettes are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes every port's cassette file.
    ///
    /// The service context holding the recording adapters must be dropped
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if a recorder is still shared or a file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        fn finish_one(recorder: SharedRecorder, port: &str) -> Result<(), String> {
            let recorder = Arc::try_unwrap(recorder)
                .map_err(|_| format!("Recording adapter for {port} still has references"))?
                .into_inner()
                .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))?;
            recorder.finish().map_err(|e| format!("Failed to write {port} cassette: {e}"))?;
            Ok(())
        }

        finish_one(self.git, "git")?;
        finish_one(self.commands, "commands")?;
        finish_one(self.llm, "llm")?;
        finish_one(self.forge, "forge")?;
        finish_one(self.notifier, "notifier")?;

        Ok(self.output_dir)
    }
}

/// HEAD of `workdir`, or `"unknown"` when it cannot be resolved.
fn head_commit(workdir: &Path) -> String {
    let hash = std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .current_dir(workdir)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string());

    hash.unwrap_or_else(|| {
        warn!("Could not get git commit hash, using 'unknown'");
        "unknown".to_string()
    })
}
