//! Task files: one markdown file per branch under the task directory.
//!
//! ```text
//! jobId: <id>
//! parentBranch: <branch>
//! ---
//! # <issueKey>: <summary>
//! <free-form body>
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::AgentError;
use crate::ports::FileSystem;

const SEPARATOR: &str = "---\n";
const COMPLETED_DIR: &str = "completed";

/// The two header lines that precede the separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHeader {
    /// Identifier the callback service knows this job by.
    pub job_id: String,
    /// Branch the pull request should target.
    pub parent_branch: String,
}

/// A task file as read from disk, header parsed, body untouched.
#[derive(Debug, Clone)]
pub struct TaskFile {
    /// Location relative to the workspace root.
    pub path: PathBuf,
    /// Parsed header.
    pub header: TaskHeader,
    /// Everything after the first separator.
    pub body: String,
}

/// Everything the pipeline needs to know about the task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDescriptor {
    /// Identifier the callback service knows this job by.
    pub job_id: String,
    /// Branch the pull request should target.
    pub parent_branch: String,
    /// Ticket key from the body's first line.
    pub issue_key: String,
    /// Rest of the body's first line.
    pub summary: String,
    /// Full body text, including the first line.
    pub body: String,
}

/// Turns a branch name into a file-name-safe stem (`feature/x` → `feature-x`).
#[must_use]
pub fn sanitize_branch(branch: &str) -> String {
    branch.replace(['/', '\\'], "-")
}

/// Active task file location for `branch`.
#[must_use]
pub fn task_path(tasks_dir: &Path, branch: &str) -> PathBuf {
    tasks_dir.join(format!("{}.md", sanitize_branch(branch)))
}

/// Directory archived task files are moved into.
#[must_use]
pub fn completed_dir(tasks_dir: &Path) -> PathBuf {
    tasks_dir.join(COMPLETED_DIR)
}

/// Archived task file location for `branch`.
#[must_use]
pub fn archived_path(tasks_dir: &Path, branch: &str) -> PathBuf {
    completed_dir(tasks_dir).join(format!("{}.md", sanitize_branch(branch)))
}

impl TaskFile {
    /// Reads and parses the task file for `branch`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::TaskFileMissing`] if the file does not exist and
    /// [`AgentError::TaskFormat`] if it has no separator or a short header.
    pub fn read(fs: &dyn FileSystem, tasks_dir: &Path, branch: &str) -> Result<Self, AgentError> {
        let (path, content) = Self::read_raw(fs, tasks_dir, branch)?;
        Self::parse(path, &content)
    }

    /// Reads the task file for `branch` without parsing it.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::TaskFileMissing`] if the file does not exist.
    pub fn read_raw(
        fs: &dyn FileSystem,
        tasks_dir: &Path,
        branch: &str,
    ) -> Result<(PathBuf, String), AgentError> {
        let path = task_path(tasks_dir, branch);
        info!(path = %path.display(), "Reading task file");
        if !fs.exists(&path) {
            return Err(AgentError::TaskFileMissing { path });
        }
        let content = fs
            .read_to_string(&path)
            .map_err(|e| AgentError::io(format!("reading {}", path.display()), e))?;
        Ok((path, content))
    }

    /// Parses task file `content` found at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::TaskFormat`] if there is no `---` separator or the
    /// header has fewer than two lines.
    pub fn parse(path: PathBuf, content: &str) -> Result<Self, AgentError> {
        let content = content.replace("\r\n", "\n");
        let Some((header, body)) = content.split_once(SEPARATOR) else {
            return Err(AgentError::TaskFormat {
                path,
                reason: "missing `---` separator between header and body".into(),
            });
        };

        let mut lines = header.lines();
        let (Some(first), Some(second)) = (lines.next(), lines.next()) else {
            return Err(AgentError::TaskFormat {
                path,
                reason: "header needs a `jobId:` line and a `parentBranch:` line".into(),
            });
        };

        let header = TaskHeader {
            job_id: strip_label(first, "jobId:"),
            parent_branch: strip_label(second, "parentBranch:"),
        };
        debug!(job_id = %header.job_id, parent_branch = %header.parent_branch, "parsed task header");
        Ok(Self { path, header, body: body.to_string() })
    }

    /// Extracts the issue key and summary from the body's first line.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::TaskFormat`] if the body is empty or its first
    /// line has no `:`.
    pub fn describe(&self) -> Result<TaskDescriptor, AgentError> {
        let first_line = self.body.lines().next().unwrap_or_default();
        let Some((key, summary)) = first_line.split_once(':') else {
            return Err(AgentError::TaskFormat {
                path: self.path.clone(),
                reason: format!("first body line must look like `# KEY: summary`, got {first_line:?}"),
            });
        };

        Ok(TaskDescriptor {
            job_id: self.header.job_id.clone(),
            parent_branch: self.header.parent_branch.clone(),
            issue_key: key.trim_matches(|c| c == '#' || c == ' ').to_string(),
            summary: summary.trim().to_string(),
            body: self.body.clone(),
        })
    }
}

/// Job id from the first header line, available even when the rest of the
/// header is unusable. `None` without a separator or when the id is empty.
#[must_use]
pub fn leading_job_id(content: &str) -> Option<String> {
    let content = content.replace("\r\n", "\n");
    let (header, _) = content.split_once(SEPARATOR)?;
    let job_id = strip_label(header.lines().next()?, "jobId:");
    (!job_id.is_empty()).then_some(job_id)
}

/// Drops a leading `label` and surrounding whitespace. Lines without the
/// label are kept as-is (trimmed).
fn strip_label(line: &str, label: &str) -> String {
    let line = line.trim();
    line.strip_prefix(label).unwrap_or(line).trim().to_string()
}
