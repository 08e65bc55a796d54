//! Symlink containment.
//!
//! [`MediaRoot::resolve`] only keeps `..` from climbing out of the root. A
//! symlink inside the root can still point anywhere, so every path is
//! canonicalized here before it is opened or listed and the real target is
//! checked against the root again.

use std::path::Path;

use mb_core::{Error, MediaRoot, Result};

/// Follow symlinks in `path` and require the target to stay under `root`.
///
/// A path that does not exist (including a dangling symlink) is
/// [`Error::NotFound`]; a target outside the root is [`Error::Forbidden`].
pub async fn ensure_within_root(
    root: &MediaRoot,
    path: &Path,
    entity: &str,
    rel: &str,
) -> Result<()> {
    let target = tokio::fs::canonicalize(path)
        .await
        .map_err(|e| Error::from_io(e, entity, rel))?;

    if root.contains(&target) {
        Ok(())
    } else {
        tracing::debug!(path = %rel, target = %target.display(), "Symlink escapes media root");
        Err(Error::Forbidden(format!(
            "'{rel}' resolves outside the media root"
        )))
    }
}

/// Like [`ensure_within_root`], but for listing children: `Ok(false)` means
/// the entry should be left out.
pub async fn is_listable(root: &MediaRoot, path: &Path) -> Result<bool> {
    match tokio::fs::canonicalize(path).await {
        Ok(target) => Ok(root.contains(&target)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
