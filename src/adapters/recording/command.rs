//! Recording adapter for the `CommandRunner` port.

use serde_json::json;

use super::record_result;
use crate::cassette::session::SharedRecorder;
use crate::ports::{CommandOutput, CommandRunner};

/// Records validation command runs while delegating to an inner runner.
pub struct RecordingCommandRunner {
    inner: Box<dyn CommandRunner>,
    recorder: SharedRecorder,
}

impl RecordingCommandRunner {
    /// Creates a new recording runner wrapping the given implementation.
    pub fn new(inner: Box<dyn CommandRunner>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

impl CommandRunner for RecordingCommandRunner {
    fn run(
        &self,
        argv: &[String],
    ) -> Result<CommandOutput, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.run(argv);
        record_result(&self.recorder, "commands", "run", &json!({ "argv": argv }), &result);
        result
    }
}
