//! Cassette-backed ports for stage tests.
//!
//! A spy wraps a replaying adapter in a recording one: the replayer supplies
//! the outputs, the recorder captures the inputs the stage passed in.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde_json::Value;

use crate::adapters::recording::{RecordingCommandRunner, RecordingGitRepo};
use crate::adapters::replaying::{ReplayingCommandRunner, ReplayingGitRepo};
use crate::cassette::format::{Cassette, Interaction};
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::{CassetteReplayer, SharedReplayer};
use crate::cassette::session::SharedRecorder;

/// Output of a successful unit-returning call.
pub(crate) fn ok() -> Value {
    serde_json::json!({ "ok": null })
}

/// Replayer serving `outputs` for `port`, in order per method.
pub(crate) fn replayer(port: &str, outputs: &[(&str, Value)]) -> SharedReplayer {
    let cassette = Cassette {
        name: format!("{port}-test"),
        recorded_at: Utc::now(),
        commit: "test".into(),
        interactions: outputs
            .iter()
            .enumerate()
            .map(|(seq, (method, output))| Interaction {
                seq: seq as u64,
                port: port.into(),
                method: (*method).into(),
                input: Value::Null,
                output: output.clone(),
            })
            .collect(),
    };
    CassetteReplayer::new(&cassette).shared()
}

/// In-memory recorder; never written to disk.
pub(crate) fn recorder() -> SharedRecorder {
    Arc::new(Mutex::new(CassetteRecorder::new("unused.cassette.yaml", "spy", "test")))
}

/// Inputs of every recorded call to `method`, in call order.
pub(crate) fn inputs(recorder: &SharedRecorder, method: &str) -> Vec<Value> {
    recorder
        .lock()
        .unwrap()
        .interactions()
        .iter()
        .filter(|i| i.method == method)
        .map(|i| i.input.clone())
        .collect()
}

/// Methods called on the port, in call order.
pub(crate) fn methods(recorder: &SharedRecorder) -> Vec<String> {
    recorder.lock().unwrap().interactions().iter().map(|i| i.method.clone()).collect()
}

pub(crate) struct Spy<P> {
    pub port: P,
    pub calls: SharedRecorder,
    pub tape: SharedReplayer,
}

pub(crate) fn spy_git(outputs: &[(&str, Value)]) -> Spy<RecordingGitRepo> {
    let tape = replayer("git", outputs);
    let calls = recorder();
    let port = RecordingGitRepo::new(
        Box::new(ReplayingGitRepo::new(Arc::clone(&tape))),
        Arc::clone(&calls),
    );
    Spy { port, calls, tape }
}

pub(crate) fn spy_commands(outputs: &[(&str, Value)]) -> Spy<RecordingCommandRunner> {
    let tape = replayer("commands", outputs);
    let calls = recorder();
    let port = RecordingCommandRunner::new(
        Box::new(ReplayingCommandRunner::new(Arc::clone(&tape))),
        Arc::clone(&calls),
    );
    Spy { port, calls, tape }
}
