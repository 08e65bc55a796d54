//! Directory listing.
//!
//! Enumerates the immediate children of a directory under the media root and
//! turns each into a [`MediaEntry`]. Child stats run concurrently with a
//! bounded fan-out; the result is sorted afterwards so completion order never
//! leaks into the response.

use std::path::PathBuf;

use futures::stream::{self, StreamExt, TryStreamExt};
use mb_core::paths::child_path;
use mb_core::{sort_entries, Error, Listing, MediaEntry, MediaRoot, Result};

use crate::sandbox::{ensure_within_root, is_listable};

/// A directory entry waiting to be stat-ed.
struct Child {
    name: String,
    rel: String,
    path: PathBuf,
    is_link: bool,
}

/// List the directory at `requested` (root-relative).
pub async fn list_directory(
    root: &MediaRoot,
    requested: &str,
    concurrency: usize,
) -> Result<Listing> {
    let dir = root.resolve(requested)?;
    let current_path = root.relative(requested)?;
    ensure_within_root(root, &dir, "directory", &current_path).await?;

    let metadata = tokio::fs::metadata(&dir)
        .await
        .map_err(|e| Error::from_io(e, "directory", &current_path))?;
    if !metadata.is_dir() {
        return Err(Error::Validation(format!(
            "'{current_path}' is not a directory"
        )));
    }

    let mut read_dir = tokio::fs::read_dir(&dir)
        .await
        .map_err(|e| Error::from_io(e, "directory", &current_path))?;

    let mut children: Vec<Child> = Vec::new();
    while let Some(entry) = read_dir.next_entry().await? {
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                tracing::debug!(name = ?raw, "Skipping entry with non UTF-8 name");
                continue;
            }
        };
        // An unknown file type gets the same containment check as a link.
        let is_link = entry
            .file_type()
            .await
            .map(|t| t.is_symlink())
            .unwrap_or(true);
        children.push(Child {
            rel: child_path(&current_path, &name),
            name,
            path: entry.path(),
            is_link,
        });
    }

    let mut items: Vec<MediaEntry> = stream::iter(children)
        .map(|child| stat_entry(root, child))
        .buffer_unordered(concurrency.max(1))
        .try_filter_map(|entry| async move { Ok(entry) })
        .try_collect()
        .await?;

    sort_entries(&mut items);

    tracing::debug!(path = %current_path, count = items.len(), "Listed directory");

    Ok(Listing {
        current_path,
        items,
    })
}

/// Stat one child, following symlinks.
///
/// Returns `Ok(None)` when the child vanished after enumeration, is a
/// dangling symlink, or is a symlink whose target lies outside the root.
async fn stat_entry(root: &MediaRoot, child: Child) -> Result<Option<MediaEntry>> {
    let Child {
        name,
        rel,
        path,
        is_link,
    } = child;

    if is_link && !is_listable(root, &path).await? {
        tracing::debug!(path = %rel, "Skipping link that dangles or leaves the media root");
        return Ok(None);
    }

    let metadata = match tokio::fs::metadata(&path).await {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %rel, "Skipping entry that disappeared or dangles");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let modified = metadata.modified()?;

    let entry = if metadata.is_dir() {
        MediaEntry::folder(name, rel, modified)
    } else {
        MediaEntry::file(name, rel, metadata.len(), modified)
    };

    Ok(Some(entry))
}
