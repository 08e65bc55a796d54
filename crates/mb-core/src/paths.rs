//! Media-root sandbox.
//!
//! [`MediaRoot`] is the single trust boundary of the server: every
//! client-supplied path is resolved through it before any filesystem access.
//! The root itself is canonicalized once when the server starts; resolving a
//! request afterwards is pure path algebra and never touches the disk.

use std::path::{Component, Path, PathBuf};

use crate::error::Result;
use crate::Error;

/// A canonical directory that all served paths must stay beneath.
#[derive(Debug, Clone)]
pub struct MediaRoot {
    root: PathBuf,
}

impl MediaRoot {
    /// Canonicalize `root` and check that it is a directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let canonical = std::fs::canonicalize(root)
            .map_err(|e| Error::from_io(e, "media root", root.display()))?;

        if !canonical.is_dir() {
            return Err(Error::Validation(format!(
                "media root '{}' is not a directory",
                canonical.display()
            )));
        }

        Ok(Self { root: canonical })
    }

    /// The canonical root directory.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Resolve a client-supplied path to an absolute path under the root.
    ///
    /// The request is always joined onto the root, so a leading `/` does not
    /// make it absolute. `.` and empty segments are dropped and `..` pops one
    /// level; popping past the root is [`Error::Forbidden`].
    pub fn resolve(&self, requested: &str) -> Result<PathBuf> {
        let segments = normalize(requested)?;

        let mut resolved = self.root.clone();
        resolved.extend(segments);

        if !self.contains(&resolved) {
            return Err(escapes(requested));
        }

        Ok(resolved)
    }

    /// Whether `path` is the root or lies beneath it.
    ///
    /// Component-wise, so `/media-evil` never matches a `/media` root.
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
    }

    /// Normalized root-relative form of `requested`, always starting with `/`.
    pub fn relative(&self, requested: &str) -> Result<String> {
        let segments = normalize(requested)?;
        Ok(format!("/{}", segments.join("/")))
    }
}

/// Join a child name onto a root-relative directory path.
pub fn child_path(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{parent}{name}")
    } else {
        format!("{parent}/{name}")
    }
}

fn normalize(requested: &str) -> Result<Vec<&str>> {
    if requested.contains('\0') {
        return Err(escapes(requested));
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in requested.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(escapes(requested));
                }
            }
            name => {
                // Rejects anything the platform would treat as more than a
                // plain file name, e.g. a `C:` drive prefix on Windows.
                let mut components = Path::new(name).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(_)), None) => segments.push(name),
                    _ => return Err(escapes(requested)),
                }
            }
        }
    }

    Ok(segments)
}

fn escapes(requested: &str) -> Error {
    Error::Forbidden(format!("'{requested}' resolves outside the media root"))
}
