//! Recording adapter for the `CompletionNotifier` port.

use super::record_result;
use crate::cassette::session::SharedRecorder;
use crate::ports::{CompletionNotifier, CompletionSignal, NotifyFuture};

/// Records completion signals while delegating to an inner notifier.
pub struct RecordingNotifier {
    inner: Box<dyn CompletionNotifier>,
    recorder: SharedRecorder,
}

impl RecordingNotifier {
    /// Creates a new recording notifier wrapping the given implementation.
    pub fn new(inner: Box<dyn CompletionNotifier>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

impl CompletionNotifier for RecordingNotifier {
    fn notify<'a>(&'a self, signal: &'a CompletionSignal) -> NotifyFuture<'a> {
        Box::pin(async move {
            let result = self.inner.notify(signal).await;
            record_result(&self.recorder, "notifier", "notify", signal, &result);
            result
        })
    }
}
