//! Cassette configuration for composable per-port replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::{CassetteReplayer, SharedReplayer};

/// Per-port cassette files. Ports without a file are unconfigured and
/// panic if the pipeline calls them during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Cassette for the git port.
    pub git: Option<PathBuf>,
    /// Cassette for the validation command port.
    pub commands: Option<PathBuf>,
    /// Cassette for the LLM port.
    pub llm: Option<PathBuf>,
    /// Cassette for the pull request host port.
    pub forge: Option<PathBuf>,
    /// Cassette for the completion notifier port.
    pub notifier: Option<PathBuf>,
}

/// Loaded replayers, one per configured port.
#[derive(Default)]
pub struct PortReplayers {
    /// Replayer for the git port.
    pub git: Option<SharedReplayer>,
    /// Replayer for the validation command port.
    pub commands: Option<SharedReplayer>,
    /// Replayer for the LLM port.
    pub llm: Option<SharedReplayer>,
    /// Replayer for the pull request host port.
    pub forge: Option<SharedReplayer>,
    /// Replayer for the completion notifier port.
    pub notifier: Option<SharedReplayer>,
}

impl CassetteConfig {
    /// Picks up `<port>.cassette.yaml` files that exist in `dir`, the layout
    /// a recording session writes.
    #[must_use]
    pub fn from_dir(dir: &Path) -> Self {
        let pick = |port: &str| {
            let path = dir.join(format!("{port}.cassette.yaml"));
            path.exists().then_some(path)
        };
        Self {
            git: pick("git"),
            commands: pick("commands"),
            llm: pick("llm"),
            forge: pick("forge"),
            notifier: pick("notifier"),
        }
    }

    /// Load a single cassette file and create a shared replayer.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_port_cassette(path: &Path) -> Result<SharedReplayer, String> {
        Ok(CassetteReplayer::new(&Cassette::load(path)?).shared())
    }

    /// Load all configured per-port cassette files and create replayers.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        let load = |path: &Option<PathBuf>| path.as_deref().map(Self::load_port_cassette).transpose();
        Ok(PortReplayers {
            git: load(&self.git)?,
            commands: load(&self.commands)?,
            llm: load(&self.llm)?,
            forge: load(&self.forge)?,
            notifier: load(&self.notifier)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::recorder::CassetteRecorder;
    use serde_json::json;

    #[test]
    fn from_dir_only_picks_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut llm = CassetteRecorder::new(dir.path().join("llm.cassette.yaml"), "llm", "abc");
        llm.record("llm", "complete", json!({}), json!({"ok": {"text": "{}"}}));
        llm.finish().unwrap();

        let config = CassetteConfig::from_dir(dir.path());

        assert_eq!(config.llm, Some(dir.path().join("llm.cassette.yaml")));
        assert!(config.git.is_none());
        assert!(config.commands.is_none());
        assert!(config.forge.is_none());
        assert!(config.notifier.is_none());
    }

    #[test]
    fn load_all_builds_replayers_for_configured_ports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("git.cassette.yaml");
        let mut git = CassetteRecorder::new(&path, "git", "abc");
        git.record("git", "status_porcelain", json!(null), json!({"ok": ""}));
        git.finish().unwrap();

        let config = CassetteConfig { git: Some(path), ..CassetteConfig::default() };
        let replayers = config.load_all().unwrap();

        let git = replayers.git.unwrap();
        assert_eq!(git.lock().unwrap().remaining("git", "status_porcelain"), 1);
        assert!(replayers.llm.is_none());
    }

    #[test]
    fn load_all_fails_on_missing_file() {
        let config = CassetteConfig {
            forge: Some(PathBuf::from("/nonexistent/forge.cassette.yaml")),
            ..CassetteConfig::default()
        };
        assert!(config.load_all().is_err());
    }
}
