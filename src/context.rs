//! Service context bundling all port trait objects.

use std::path::Path;

use tracing::{info, warn};

use crate::adapters::live::command::LiveCommandRunner;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::forge::GitHubPullRequests;
use crate::adapters::live::git::LiveGitRepo;
use crate::adapters::live::llm::GeminiClient;
use crate::adapters::live::notifier::HttpCallbackNotifier;
use crate::adapters::recording::{
    RecordingCommandRunner, RecordingGitRepo, RecordingLlmClient, RecordingNotifier,
    RecordingPullRequestHost,
};
use crate::adapters::replaying::{
    ReplayingCommandRunner, ReplayingGitRepo, ReplayingLlmClient, ReplayingNotifier,
    ReplayingPullRequestHost,
};
use crate::cassette::config::CassetteConfig;
use crate::cassette::session::RecordingSession;
use crate::config::Config;
use crate::error::AgentError;
use crate::ports::{
    CommandRunner, CompletionNotifier, FileSystem, GitRepo, LlmClient, PullRequestHost,
};

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, replaying, recording).
pub struct ServiceContext {
    /// Workspace filesystem, rooted at the repository.
    pub fs: Box<dyn FileSystem>,
    /// Git working tree.
    pub git: Box<dyn GitRepo>,
    /// Runner for validation commands.
    pub commands: Box<dyn CommandRunner>,
    /// Language model producing the change plan.
    pub llm: Box<dyn LlmClient>,
    /// Pull request host; `None` skips the pull request stage.
    pub forge: Option<Box<dyn PullRequestHost>>,
    /// Completion callback; `None` skips notification.
    pub notifier: Option<Box<dyn CompletionNotifier>>,
}

impl ServiceContext {
    /// Creates a context with real adapters for every port.
    ///
    /// The forge is only wired when `GITHUB_TOKEN` is set and the notifier
    /// only when `CALLBACK_URL` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn live(config: &Config) -> Result<Self, AgentError> {
        let http = |e: reqwest::Error| AgentError::Config(format!("building HTTP client: {e}"));

        let forge: Option<Box<dyn PullRequestHost>> = match &config.github_token {
            Some(token) => Some(Box::new(
                GitHubPullRequests::new(&config.github_api_url, token, config.http_timeout)
                    .map_err(http)?,
            )),
            None => {
                warn!("GITHUB_TOKEN not set; pull requests will not be opened");
                None
            }
        };
        let notifier: Option<Box<dyn CompletionNotifier>> = match &config.callback_url {
            Some(url) => {
                Some(Box::new(HttpCallbackNotifier::new(url, config.http_timeout).map_err(http)?))
            }
            None => {
                warn!("CALLBACK_URL not set; completion will not be reported");
                None
            }
        };

        Ok(Self {
            fs: Box::new(LiveFileSystem::new(&config.workdir)),
            git: Box::new(LiveGitRepo::new(&config.workdir)),
            commands: Box::new(LiveCommandRunner::new(&config.workdir)),
            llm: Box::new(
                GeminiClient::new(
                    &config.gemini_api_base,
                    config.gemini_api_key.clone(),
                    config.http_timeout,
                )
                .map_err(http)?,
            ),
            forge,
            notifier,
        })
    }

    /// Creates a live context whose external calls are also written to
    /// per-port cassettes under `root`.
    ///
    /// The filesystem is not recorded; replay runs against a real workspace.
    /// Call [`RecordingSession::finish`] after dropping the context.
    ///
    /// # Errors
    ///
    /// Returns an error if the live context or the cassette directory cannot
    /// be created.
    pub fn recording(config: &Config, root: &Path) -> Result<(Self, RecordingSession), AgentError> {
        let live = Self::live(config)?;
        let session = RecordingSession::new(root, &config.workdir).map_err(AgentError::Config)?;
        info!(dir = %session.output_dir().display(), "Recording cassettes");

        let ctx = Self {
            fs: live.fs,
            git: Box::new(RecordingGitRepo::new(live.git, session.git.clone())),
            commands: Box::new(RecordingCommandRunner::new(
                live.commands,
                session.commands.clone(),
            )),
            llm: Box::new(RecordingLlmClient::new(live.llm, session.llm.clone())),
            forge: live.forge.map(|inner| -> Box<dyn PullRequestHost> {
                Box::new(RecordingPullRequestHost::new(inner, session.forge.clone()))
            }),
            notifier: live.notifier.map(|inner| -> Box<dyn CompletionNotifier> {
                Box::new(RecordingNotifier::new(inner, session.notifier.clone()))
            }),
        };
        Ok((ctx, session))
    }

    /// Creates a replaying context from per-port cassette files, with a live
    /// filesystem rooted at `workdir`.
    ///
    /// Git, command and LLM ports without a cassette panic when called.
    /// Missing forge or notifier cassettes disable those stages.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig, workdir: &Path) -> Result<Self, AgentError> {
        let replayers = config.load_all().map_err(AgentError::Config)?;

        Ok(Self {
            fs: Box::new(LiveFileSystem::new(workdir)),
            git: Box::new(
                replayers.git.map_or_else(ReplayingGitRepo::unconfigured, ReplayingGitRepo::new),
            ),
            commands: Box::new(
                replayers
                    .commands
                    .map_or_else(ReplayingCommandRunner::unconfigured, ReplayingCommandRunner::new),
            ),
            llm: Box::new(
                replayers.llm.map_or_else(ReplayingLlmClient::unconfigured, ReplayingLlmClient::new),
            ),
            forge: replayers.forge.map(|r| -> Box<dyn PullRequestHost> {
                Box::new(ReplayingPullRequestHost::new(r))
            }),
            notifier: replayers
                .notifier
                .map(|r| -> Box<dyn CompletionNotifier> { Box::new(ReplayingNotifier::new(r)) }),
        })
    }
}
