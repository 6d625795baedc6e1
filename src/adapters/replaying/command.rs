//! Replaying adapter for the `CommandRunner` port.

use super::{next_output, replay_result};
use crate::cassette::replayer::SharedReplayer;
use crate::ports::{CommandOutput, CommandRunner};

/// Replays recorded validation command results from a cassette.
pub struct ReplayingCommandRunner {
    replayer: Option<SharedReplayer>,
}

impl ReplayingCommandRunner {
    /// Create a replaying runner backed by the given replayer.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer: Some(replayer) }
    }

    /// Create a replaying runner with no cassette. Panics when called.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }
}

impl CommandRunner for ReplayingCommandRunner {
    fn run(
        &self,
        _argv: &[String],
    ) -> Result<CommandOutput, Box<dyn std::error::Error + Send + Sync>> {
        replay_result(next_output(self.replayer.as_ref(), "commands", "run"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use crate::cassette::replayer::CassetteReplayer;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn replays_failed_run() {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "commands".into(),
                method: "run".into(),
                input: json!({"argv": ["vendor/bin/phpunit"]}),
                output: json!({"ok": {"exit_code": 2, "stdout": "FAILURES!", "stderr": ""}}),
            }],
        };
        let runner = ReplayingCommandRunner::new(CassetteReplayer::new(&cassette).shared());

        let output = runner.run(&["vendor/bin/phpunit".to_string()]).unwrap();

        assert_eq!(output.exit_code, 2);
        assert!(!output.success());
        assert_eq!(output.stdout, "FAILURES!");
    }
}
