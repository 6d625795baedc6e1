//! Recording adapters that capture interactions to cassettes.
//!
//! Each adapter delegates to an inner implementation and appends the call
//! and its outcome to the port's recorder. The outcome is returned unchanged.

pub mod command;
pub mod forge;
pub mod git;
pub mod llm;
pub mod notifier;

use serde::Serialize;

use crate::cassette::session::SharedRecorder;

pub use command::RecordingCommandRunner;
pub use forge::RecordingPullRequestHost;
pub use git::RecordingGitRepo;
pub use llm::RecordingLlmClient;
pub use notifier::RecordingNotifier;

/// Record a `Result<T, E>` interaction using the ok/err JSON convention.
///
/// Mirror of `replaying::replay_result`.
pub(crate) fn record_result<I, T, E>(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    I: Serialize + ?Sized,
    T: Serialize,
    E: std::fmt::Display,
{
    let mut guard = recorder.lock().expect("recorder lock poisoned");
    guard.record_result(port, method, input, result);
}
