//! Live adapter for the `LlmClient` port using the Gemini `generateContent` API.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ports::llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};

/// Live LLM client that calls the Google Gemini API.
pub struct GeminiClient {
    client: Client,
    api_base: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Creates a client for `api_base` (e.g. `https://generativelanguage.googleapis.com/v1beta`).
    ///
    /// A missing key is not rejected here; Gemini answers with an
    /// authentication error instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_base: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, api_base: api_base.into(), api_key })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.api_base)
    }
}

/// Request body sent to `generateContent`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

/// Top-level `generateContent` response.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

/// Error envelope returned by Google APIs.
#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

/// Extracts the text of the first candidate from a successful response body.
fn parse_response(body: &str) -> Result<CompletionResponse, Box<dyn std::error::Error + Send + Sync>> {
    let response: GeminiResponse = serde_json::from_str(body)
        .map_err(|e| format!("Failed to parse Gemini API response: {e}"))?;

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(format!("Gemini returned no content: {reason}").into());
    };

    let text = candidate
        .content
        .map(|c| c.parts.into_iter().map(|p| p.text).collect::<String>())
        .unwrap_or_default();
    let (prompt_tokens, completion_tokens) = response
        .usage_metadata
        .map_or((0, 0), |u| (u.prompt_token_count, u.candidates_token_count));

    Ok(CompletionResponse { text, prompt_tokens, completion_tokens })
}

impl GeminiClient {
    async fn generate(
        &self,
        url: String,
        prompt: String,
        max_tokens: Option<u32>,
    ) -> Result<CompletionResponse, Box<dyn std::error::Error + Send + Sync>> {
        let api_key = self.api_key.clone().unwrap_or_else(|| {
            warn!("GEMINI_API_KEY is not set; the request will be rejected");
            String::new()
        });

        let body = GeminiRequest {
            contents: vec![GeminiContent { role: "user", parts: vec![GeminiPart { text: &prompt }] }],
            generation_config: max_tokens.map(|max_output_tokens| GenerationConfig { max_output_tokens }),
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Gemini API request failed: {e}"))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| format!("Failed to read Gemini API response: {e}"))?;

        if !status.is_success() {
            let msg = serde_json::from_str::<GeminiError>(&response_text)
                .map(|e| e.error.message)
                .unwrap_or(response_text);
            return Err(format!("Gemini API error ({}): {msg}", status.as_u16()).into());
        }

        let completion = parse_response(&response_text)?;
        debug!(
            prompt_tokens = completion.prompt_tokens,
            completion_tokens = completion.completion_tokens,
            "Gemini completion received"
        );
        Ok(completion)
    }
}

impl LlmClient for GeminiClient {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        let url = self.endpoint(&request.model);
        Box::pin(self.generate(url, request.prompt.clone(), request.max_tokens))
    }
}
