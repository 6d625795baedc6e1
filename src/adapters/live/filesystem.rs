//! Live filesystem adapter using `std::fs`.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::ports::filesystem::FileSystem;

/// Live filesystem adapter backed by real disk I/O, rooted at the workspace.
pub struct LiveFileSystem {
    root: PathBuf,
}

impl LiveFileSystem {
    /// Creates an adapter resolving relative paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    /// Fails if the deepest existing entry on the way to `target` resolves,
    /// through symlinks, to somewhere outside the root. A dangling symlink
    /// counts as existing and is refused since it cannot be resolved.
    fn ensure_inside_root(
        &self,
        target: &Path,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let root = self.root.canonicalize()?;
        let mut existing = target;
        while existing.symlink_metadata().is_err() {
            match existing.parent() {
                Some(parent) => existing = parent,
                None => break,
            }
        }
        let resolved = existing.canonicalize().map_err(|e| {
            format!("{} cannot be resolved inside {}: {e}", existing.display(), root.display())
        })?;
        if resolved.starts_with(&root) {
            Ok(())
        } else {
            Err(format!(
                "{} resolves to {}, outside {}",
                target.display(),
                resolved.display(),
                root.display()
            )
            .into())
        }
    }
}

impl FileSystem for LiveFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Ok(std::fs::read_to_string(self.resolve(path))?)
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let path = self.resolve(path);
        self.ensure_inside_root(&path)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(std::fs::write(path, contents)?)
    }

    fn append(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut file = std::fs::OpenOptions::new().append(true).open(self.resolve(path))?;
        file.write_all(contents.as_bytes())?;
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(std::fs::create_dir_all(self.resolve(path))?)
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }
}
