//! Replaying adapters that serve recorded interactions back to the pipeline.

pub mod command;
pub mod forge;
pub mod git;
pub mod llm;
pub mod notifier;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::SharedReplayer;

pub use command::ReplayingCommandRunner;
pub use forge::ReplayingPullRequestHost;
pub use git::ReplayingGitRepo;
pub use llm::ReplayingLlmClient;
pub use notifier::ReplayingNotifier;

/// Pull the next recorded output for `port::method`.
///
/// # Panics
///
/// Panics when the adapter has no cassette or the cassette is exhausted.
pub(crate) fn next_output(
    replayer: Option<&SharedReplayer>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let Some(replayer) = replayer else {
        panic!("{port} port has no cassette loaded; cannot replay {port}::{method}");
    };
    let mut guard = replayer.lock().expect("replayer lock poisoned");
    guard.next_interaction(port, method).output.clone()
}

/// Decode an output written by `recording::record_result`.
///
/// `{"err": msg}` becomes `Err(msg)`, `{"ok": v}` is deserialized into `T`.
/// Outputs without either key are deserialized as-is.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    if let Some(err) = output.get("err") {
        return Err(err.as_str().unwrap_or("unknown error").to_string().into());
    }
    let value = match output {
        serde_json::Value::Object(mut map) if map.contains_key("ok") => {
            map.remove("ok").unwrap_or_default()
        }
        other => other,
    };
    serde_json::from_value(value)
        .map_err(|e| format!("recorded output does not match the port's return type: {e}").into())
}
