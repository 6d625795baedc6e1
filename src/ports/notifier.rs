//! Completion notifier port.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// Boxed future returned by [`CompletionNotifier::notify`].
pub type NotifyFuture<'a> =
    Pin<Box<dyn Future<Output = Result<(), Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// Final status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Everything was pushed, archived and (optionally) a PR opened.
    Success,
    /// Some stage failed.
    Failure,
}

/// Payload reported to the callback service once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionSignal {
    /// Job identifier from the task file header.
    #[serde(rename = "jobId")]
    pub job_id: String,
    /// Outcome of the run.
    pub status: JobStatus,
    /// Human-readable summary.
    pub message: String,
}

/// Reports job completion to an external service.
pub trait CompletionNotifier: Send + Sync {
    /// Delivers the signal.
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be reached or rejects the signal.
    fn notify<'a>(&'a self, signal: &'a CompletionSignal) -> NotifyFuture<'a>;
}
