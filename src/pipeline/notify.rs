//! Best-effort completion report.

use tracing::{error, info, instrument, warn};

use crate::error::AgentError;
use crate::ports::{CompletionNotifier, CompletionSignal, JobStatus};

/// Message reported after a successful run.
#[must_use]
pub fn success_message(issue_key: &str, pull_request_url: Option<&str>) -> String {
    match pull_request_url {
        Some(url) => {
            format!("Successfully pushed changes for {issue_key}.\nPull Request created: {url}")
        }
        None => format!("Successfully pushed changes for {issue_key}."),
    }
}

/// Message reported after a failed run.
#[must_use]
pub fn failure_message(err: &AgentError) -> String {
    format!("An error occurred during execution: {err}")
}

/// Sends `status` and `message` for `job_id`. Never fails: a missing
/// notifier and delivery errors are logged and dropped. Failures are only
/// reported for a non-empty job id; success is always reported.
#[instrument(skip_all, fields(%job_id, ?status))]
pub async fn notify(
    notifier: Option<&dyn CompletionNotifier>,
    job_id: &str,
    status: JobStatus,
    message: &str,
) {
    let Some(notifier) = notifier else {
        warn!("CALLBACK_URL not set. Skipping completion signal.");
        return;
    };
    if status == JobStatus::Failure && job_id.is_empty() {
        warn!("Task file has no job id. Skipping completion signal.");
        return;
    }

    let signal = CompletionSignal { job_id: job_id.to_string(), status, message: message.to_string() };
    info!("Sending completion signal");
    match notifier.notify(&signal).await {
        Ok(()) => info!("Completion signal sent"),
        Err(e) => error!(error = %e, "Failed to send completion signal"),
    }
}
