//! One agent run, from task file to completion signal.
//!
//! Stages run strictly in order and the first failure short-circuits the
//! rest. Once the task header has been read, the outcome (success or
//! failure) is reported to the completion notifier.

pub mod apply;
pub mod archive;
pub mod notify;
pub mod publish;
pub mod validate;
pub mod vcs;

#[cfg(test)]
pub(crate) mod testing;

use std::path::Path;

use tracing::{debug, error, info, instrument};

use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::AgentError;
use crate::plan::{build_prompt, parse_plan};
use crate::ports::{CompletionRequest, FileSystem, JobStatus};
use crate::task::{leading_job_id, TaskFile};

/// The job being worked on, known once the task header parsed.
#[derive(Debug, Clone)]
pub struct JobContext {
    /// Identifier reported back to the callback service.
    pub job_id: String,
    /// The loaded task file.
    pub task_file: TaskFile,
}

/// A task file that could not be loaded.
#[derive(Debug)]
pub struct LoadFailure {
    /// Job id from the first header line, if the file got that far.
    pub job_id: Option<String>,
    /// Why loading failed.
    pub error: AgentError,
}

impl JobContext {
    /// Reads the task file for `branch` and captures its job id.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadFailure`] if the task file is missing or its header is
    /// malformed. A header whose first line names a job keeps that id.
    pub fn load(fs: &dyn FileSystem, tasks_dir: &Path, branch: &str) -> Result<Self, LoadFailure> {
        let (path, content) = TaskFile::read_raw(fs, tasks_dir, branch)
            .map_err(|error| LoadFailure { job_id: None, error })?;
        match TaskFile::parse(path, &content) {
            Ok(task_file) => Ok(Self { job_id: task_file.header.job_id.clone(), task_file }),
            Err(error) => Err(LoadFailure { job_id: leading_job_id(&content), error }),
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Ticket the work was done for.
    pub issue_key: String,
    /// Whether the plan produced a feature commit.
    pub feature_committed: bool,
    /// Web URL of the opened pull request, if one was opened.
    pub pull_request_url: Option<String>,
    /// Message sent with the success signal.
    pub message: String,
}

/// Runs every stage for `config.branch` and reports the result.
///
/// # Errors
///
/// Returns the first stage failure. The failure has already been reported
/// to the notifier when a job id was known.
#[instrument(skip_all, fields(branch = %config.branch))]
pub async fn run(ctx: &ServiceContext, config: &Config) -> Result<Outcome, AgentError> {
    let job = match JobContext::load(ctx.fs.as_ref(), &config.tasks_dir, &config.branch) {
        Ok(job) => job,
        Err(LoadFailure { job_id, error }) => {
            error!(error = %error, "Could not load task file");
            if let Some(job_id) = job_id {
                notify::notify(
                    ctx.notifier.as_deref(),
                    &job_id,
                    JobStatus::Failure,
                    &notify::failure_message(&error),
                )
                .await;
            }
            return Err(error);
        }
    };

    match execute(ctx, config, &job).await {
        Ok(outcome) => {
            info!(issue_key = %outcome.issue_key, "Run finished");
            notify::notify(ctx.notifier.as_deref(), &job.job_id, JobStatus::Success, &outcome.message)
                .await;
            Ok(outcome)
        }
        Err(err) => {
            error!(error = %err, "Run failed");
            notify::notify(
                ctx.notifier.as_deref(),
                &job.job_id,
                JobStatus::Failure,
                &notify::failure_message(&err),
            )
            .await;
            Err(err)
        }
    }
}

async fn execute(
    ctx: &ServiceContext,
    config: &Config,
    job: &JobContext,
) -> Result<Outcome, AgentError> {
    let task = job.task_file.describe()?;
    info!(issue_key = %task.issue_key, summary = %task.summary, "Task loaded");

    let request = CompletionRequest {
        model: config.model.clone(),
        prompt: build_prompt(&task.issue_key, &task.body),
        max_tokens: None,
    };
    info!(model = %request.model, "Requesting change plan");
    let response = ctx.llm.complete(&request).await.map_err(|e| AgentError::Llm(e.to_string()))?;
    debug!(
        prompt_tokens = response.prompt_tokens,
        completion_tokens = response.completion_tokens,
        "model answered"
    );
    let plan = parse_plan(&response.text)?;
    info!(
        files = plan.files.len(),
        commands = plan.validation_commands.len(),
        explanation = plan.explanation(),
        "Plan received"
    );

    vcs::log_plan(
        ctx.fs.as_ref(),
        ctx.git.as_ref(),
        &job.task_file.path,
        &task.issue_key,
        plan.explanation(),
    )?;
    apply::apply_changes(ctx.fs.as_ref(), ctx.git.as_ref(), &plan.files)?;
    validate::run_validations(ctx.commands.as_ref(), &plan.validation_commands)?;
    let feature_committed = vcs::commit_and_push(
        ctx.git.as_ref(),
        &plan.commit_message(&task.issue_key),
        &config.remote,
        &config.branch,
    )?;

    let pull_request_url = publish::open_pull_request(
        ctx.forge.as_deref(),
        ctx.git.as_ref(),
        &config.remote,
        &task,
        &config.branch,
    )
    .await?;

    archive::archive_task(
        ctx.fs.as_ref(),
        ctx.git.as_ref(),
        &config.tasks_dir,
        &config.branch,
        &task.issue_key,
        &config.remote,
    )?;

    Ok(Outcome {
        message: notify::success_message(&task.issue_key, pull_request_url.as_deref()),
        issue_key: task.issue_key,
        feature_committed,
        pull_request_url,
    })
}
