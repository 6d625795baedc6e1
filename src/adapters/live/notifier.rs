//! Live adapter for the `CompletionNotifier` port.

use std::time::Duration;

use reqwest::Client;

use crate::ports::notifier::{CompletionNotifier, CompletionSignal, NotifyFuture};

/// Posts completion signals to `<base_url>/complete`.
pub struct HttpCallbackNotifier {
    client: Client,
    base_url: String,
}

impl HttpCallbackNotifier {
    /// Creates a notifier for the callback service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url: base_url.into() })
    }

    fn complete_url(&self) -> String {
        format!("{}/complete", self.base_url)
    }
}

impl HttpCallbackNotifier {
    async fn post(
        &self,
        signal: &CompletionSignal,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.client.post(self.complete_url()).json(signal).send().await?.error_for_status()?;
        Ok(())
    }
}

impl CompletionNotifier for HttpCallbackNotifier {
    fn notify<'a>(&'a self, signal: &'a CompletionSignal) -> NotifyFuture<'a> {
        Box::pin(self.post(signal))
    }
}
