//! Replaying adapter for the `CompletionNotifier` port.

use super::{next_output, replay_result};
use crate::cassette::replayer::SharedReplayer;
use crate::ports::{CompletionNotifier, CompletionSignal, NotifyFuture};

/// Acknowledges completion signals with recorded outcomes.
pub struct ReplayingNotifier {
    replayer: SharedReplayer,
}

impl ReplayingNotifier {
    /// Create a replaying notifier backed by the given replayer.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer }
    }
}

impl CompletionNotifier for ReplayingNotifier {
    fn notify<'a>(&'a self, _signal: &'a CompletionSignal) -> NotifyFuture<'a> {
        let output = next_output(Some(&self.replayer), "notifier", "notify");
        Box::pin(async move { replay_result::<()>(output) })
    }
}
