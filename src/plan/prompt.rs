//! Prompt sent to the model.

/// Builds the single-turn prompt asking for a JSON change plan for
/// `issue_key`, embedding the full task `body`.
#[must_use]
pub fn build_prompt(issue_key: &str, body: &str) -> String {
    format!(
        r#"You are an expert software developer working in a development container.
Your task is to implement the following requirement described in ticket {issue_key}.

**Task Description:**
---
{body}
---

**Instructions:**
1.  Analyze the request and determine the necessary code changes.
2.  Identify the files that need to be created or modified and give their complete new content.
3.  If the task involves business logic, you MUST write a corresponding automated test.
4.  List commands that validate the change (build, tests, linters). Each command is an array of arguments and is run without a shell.
5.  Your final output MUST be a single, valid JSON object. Do not include any other text or markdown formatting outside of the JSON.

**JSON Output Structure:**
{{
  "explanation": "A brief, one-sentence explanation of your plan.",
  "files": [
    {{
      "path": "path/to/your/file",
      "content": "The full content of the file."
    }}
  ],
  "validation_commands": [
    ["command", "arg1", "arg2"]
  ],
  "commit_message": "feat({issue_key}): A concise and descriptive commit message"
}}
"#
    )
}
