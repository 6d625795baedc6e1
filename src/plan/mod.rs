//! The change plan the model answers with, and how to read it out of the
//! raw completion text.

pub mod prompt;

use serde::{Deserialize, Deserializer};

use crate::error::AgentError;

pub use prompt::build_prompt;

const DEFAULT_EXPLANATION: &str = "No explanation provided.";

/// One file to write, with its full new content.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlannedFile {
    /// Path relative to the workspace root.
    pub path: String,
    /// Complete file content; existing files are overwritten.
    pub content: String,
}

/// Structured output of the model. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChangePlan {
    /// One-sentence summary logged into the task file.
    #[serde(default)]
    pub explanation: Option<String>,
    /// Files to write, in order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub files: Vec<PlannedFile>,
    /// Argument vectors run after writing, in order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub validation_commands: Vec<Vec<String>>,
    /// Message for the feature commit.
    #[serde(default)]
    pub commit_message: Option<String>,
}

impl ChangePlan {
    /// The model's explanation, or a placeholder.
    #[must_use]
    pub fn explanation(&self) -> &str {
        self.explanation.as_deref().unwrap_or(DEFAULT_EXPLANATION)
    }

    /// The model's commit message, or `feat(<issue_key>): Complete task via AI agent`.
    #[must_use]
    pub fn commit_message(&self, issue_key: &str) -> String {
        self.commit_message
            .clone()
            .unwrap_or_else(|| format!("feat({issue_key}): Complete task via AI agent"))
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Removes a leading ```` ```json ```` / ```` ``` ```` fence and a trailing
/// ```` ``` ```` fence, plus surrounding whitespace.
#[must_use]
pub fn strip_code_fences(raw: &str) -> &str {
    let text = raw.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

/// Parses the model's raw answer into a [`ChangePlan`].
///
/// # Errors
///
/// Returns [`AgentError::PlanParse`] if the text is not a JSON object or a
/// field has the wrong type.
pub fn parse_plan(raw: &str) -> Result<ChangePlan, AgentError> {
    let text = strip_code_fences(raw);
    serde_json::from_str(text).map_err(|e| {
        let preview: String = text.chars().take(200).collect();
        AgentError::PlanParse(format!("{e} (response starts with {preview:?})"))
    })
}
