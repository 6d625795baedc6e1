//! Runtime configuration assembled from CLI flags and environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::error::AgentError;

/// Default Gemini model when neither `--model` nor `GEMINI_MODEL` is given.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";
/// Default Gemini REST base URL.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default GitHub REST base URL.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 300;

/// Everything a run needs to know about its surroundings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Branch being worked on, exactly as passed on the command line.
    pub branch: String,
    /// Repository root; every relative path is resolved against it.
    pub workdir: PathBuf,
    /// Task directory, relative to `workdir`.
    pub tasks_dir: PathBuf,
    /// Git remote name.
    pub remote: String,
    /// Gemini model id.
    pub model: String,
    /// Gemini API key. Not checked up front.
    pub gemini_api_key: Option<String>,
    /// Gemini REST base URL, without trailing slash.
    pub gemini_api_base: String,
    /// Base URL receiving the completion signal.
    pub callback_url: Option<String>,
    /// Token used to open pull requests.
    pub github_token: Option<String>,
    /// GitHub REST base URL, without trailing slash.
    pub github_api_url: String,
    /// Timeout applied to every outbound HTTP request.
    pub http_timeout: Duration,
    /// Directory to write port cassettes into, when recording.
    pub record_dir: Option<PathBuf>,
    /// Directory of recorded cassettes to replay instead of calling out.
    pub replay_dir: Option<PathBuf>,
}

impl Config {
    /// Builds the configuration from parsed CLI flags and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `TASKPILOT_HTTP_TIMEOUT_SECS` is not a whole number.
    pub fn from_env(cli: &Cli) -> Result<Self, AgentError> {
        Self::from_lookup(cli, |key| std::env::var(key).ok())
    }

    /// Builds the configuration using `lookup` for environment values.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if `TASKPILOT_HTTP_TIMEOUT_SECS` is not a whole number.
    pub fn from_lookup<F>(cli: &Cli, lookup: F) -> Result<Self, AgentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let http_timeout = match get("TASKPILOT_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                AgentError::Config(format!("TASKPILOT_HTTP_TIMEOUT_SECS={raw:?}: {e}"))
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            branch: cli.branch.clone(),
            workdir: cli.workdir.clone(),
            tasks_dir: cli.tasks_dir.clone(),
            remote: cli.remote.clone(),
            model: cli
                .model
                .clone()
                .or_else(|| get("GEMINI_MODEL"))
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_api_base: trim_base(
                get("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.into()),
            ),
            callback_url: get("CALLBACK_URL").map(trim_base),
            github_token: get("GITHUB_TOKEN"),
            github_api_url: trim_base(
                get("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_GITHUB_API_URL.into()),
            ),
            http_timeout: Duration::from_secs(http_timeout),
            record_dir: get("TASKPILOT_RECORD").map(PathBuf::from),
            replay_dir: get("TASKPILOT_REPLAY").map(PathBuf::from),
        })
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use clap::Parser;

    use super::*;

    fn config_with(vars: &[(&str, &str)]) -> Result<Config, AgentError> {
        let env: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        let cli = Cli::parse_from(["taskpilot", "feature/ABC-1"]);
        Config::from_lookup(&cli, |key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = config_with(&[]).unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.gemini_api_base, DEFAULT_GEMINI_API_BASE);
        assert_eq!(config.github_api_url, DEFAULT_GITHUB_API_URL);
        assert!(config.gemini_api_key.is_none());
        assert!(config.callback_url.is_none());
        assert!(config.github_token.is_none());
        assert!(config.record_dir.is_none());
        assert!(config.replay_dir.is_none());
        assert_eq!(config.http_timeout, Duration::from_secs(300));
    }

    #[test]
    fn empty_values_count_as_unset() {
        let config = config_with(&[("GITHUB_TOKEN", ""), ("CALLBACK_URL", "  ")]).unwrap();
        assert!(config.github_token.is_none());
        assert!(config.callback_url.is_none());
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_urls() {
        let config = config_with(&[
            ("CALLBACK_URL", "https://hooks.example.com/jobs/"),
            ("GITHUB_API_URL", "https://ghe.example.com/api/v3/"),
        ])
        .unwrap();
        assert_eq!(config.callback_url.as_deref(), Some("https://hooks.example.com/jobs"));
        assert_eq!(config.github_api_url, "https://ghe.example.com/api/v3");
    }

    #[test]
    fn cli_model_wins_over_environment() {
        let env: HashMap<&str, &str> = HashMap::from([("GEMINI_MODEL", "from-env")]);
        let cli = Cli::parse_from(["taskpilot", "b", "--model", "from-cli"]);
        let config =
            Config::from_lookup(&cli, |key| env.get(key).map(|v| (*v).to_string())).unwrap();
        assert_eq!(config.model, "from-cli");
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let err = config_with(&[("TASKPILOT_HTTP_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("TASKPILOT_HTTP_TIMEOUT_SECS"));
    }
}
