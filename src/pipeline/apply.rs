//! Writes the planned files into the workspace and stages them.

use std::path::{Component, Path, PathBuf};

use tracing::{info, instrument};

use crate::error::AgentError;
use crate::plan::PlannedFile;
use crate::ports::{FileSystem, GitRepo};

/// Normalizes a model-supplied path to one relative to the workspace root.
///
/// `.` segments are dropped and `..` segments cancel the previous one.
///
/// # Errors
///
/// Returns [`AgentError::PathOutsideWorkspace`] for absolute paths, paths
/// that climb above the root, empty paths and paths inside `.git`.
pub fn confine(path: &str) -> Result<PathBuf, AgentError> {
    let reject = || AgentError::PathOutsideWorkspace { path: path.to_string() };

    let mut normalized = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    return Err(reject());
                }
            }
            Component::RootDir | Component::Prefix(_) => return Err(reject()),
        }
    }

    if normalized.as_os_str().is_empty() || is_git_dir(&normalized) {
        return Err(reject());
    }
    Ok(normalized)
}

/// Whether `path` starts in the repository's `.git` directory, in any case,
/// since case-insensitive filesystems map `.GIT` onto it.
fn is_git_dir(path: &Path) -> bool {
    path.components().next().is_some_and(|first| {
        first.as_os_str().to_str().is_some_and(|name| name.eq_ignore_ascii_case(".git"))
    })
}

/// Writes every file in order and `git add`s it.
///
/// All paths are checked before anything is written, so a rejected path
/// leaves the workspace untouched.
///
/// # Errors
///
/// Returns the first containment, write or staging failure.
#[instrument(skip_all, fields(files = files.len()))]
pub fn apply_changes(
    fs: &dyn FileSystem,
    git: &dyn GitRepo,
    files: &[PlannedFile],
) -> Result<(), AgentError> {
    let targets = files
        .iter()
        .map(|file| confine(&file.path).map(|path| (path, file.content.as_str())))
        .collect::<Result<Vec<_>, _>>()?;

    for (path, content) in targets {
        info!(path = %path.display(), bytes = content.len(), "Writing file");
        fs.write(&path, content)
            .map_err(|e| AgentError::io(format!("writing {}", path.display()), e))?;
        git.add(&path).map_err(|e| AgentError::git("add", e))?;
    }
    Ok(())
}
