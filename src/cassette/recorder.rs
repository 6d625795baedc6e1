//! Records port interactions into a cassette file.

use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;

use super::format::{Cassette, Interaction};

/// Accumulates interactions and writes them as a YAML cassette on `finish`.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    commit: String,
    interactions: Vec<Interaction>,
}

impl CassetteRecorder {
    /// Create a new recorder that will write to the given path.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            commit: commit.into(),
            interactions: Vec::new(),
        }
    }

    /// Record an interaction. The `seq` field is assigned automatically.
    pub fn record(
        &mut self,
        port: impl Into<String>,
        method: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) {
        self.interactions.push(Interaction {
            seq: self.interactions.len() as u64,
            port: port.into(),
            method: method.into(),
            input,
            output,
        });
    }

    /// Record the outcome of a fallible port call as `{"ok": v}` or `{"err": msg}`.
    ///
    /// Values that fail to serialize are stored as `null`; a recording must
    /// never change the outcome of the call it observes.
    pub fn record_result<I, T, E>(&mut self, port: &str, method: &str, input: &I, result: &Result<T, E>)
    where
        I: Serialize + ?Sized,
        T: Serialize,
        E: std::fmt::Display,
    {
        let input = serde_json::to_value(input).unwrap_or_default();
        let output = match result {
            Ok(v) => serde_json::json!({ "ok": serde_json::to_value(v).unwrap_or_default() }),
            Err(e) => serde_json::json!({ "err": e.to_string() }),
        };
        self.record(port, method, input, output);
    }

    /// Interactions recorded so far, in call order.
    #[must_use]
    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    /// Finish recording and write the cassette YAML file to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, std::io::Error> {
        let cassette = Cassette {
            name: self.name,
            recorded_at: Utc::now(),
            commit: self.commit,
            interactions: self.interactions,
        };
        cassette.save(&self.path)?;
        Ok(self.path)
    }
}
