//! Media-domain types: directory entries, their classification, and the
//! human-readable size format used in listings.

use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use mime_guess::mime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Units used by [`format_size`], in base-1024 steps.
const SIZE_UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

/// Broad classification of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Folder,
    Video,
    Image,
    Audio,
    File,
}

impl MediaKind {
    /// Classify a file by the MIME type guessed from its extension.
    ///
    /// Only the top-level type matters: `video/*`, `image/*` and `audio/*`
    /// map to their kinds, everything else (including unknown extensions) is
    /// [`MediaKind::File`].
    pub fn from_file_name(name: impl AsRef<Path>) -> Self {
        let Some(guess) = mime_guess::from_path(name).first() else {
            return MediaKind::File;
        };

        let top = guess.type_();
        if top == mime::VIDEO {
            MediaKind::Video
        } else if top == mime::IMAGE {
            MediaKind::Image
        } else if top == mime::AUDIO {
            MediaKind::Audio
        } else {
            MediaKind::File
        }
    }

    pub fn is_folder(self) -> bool {
        self == MediaKind::Folder
    }
}

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MediaEntry {
    /// Base file name, no separators.
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Root-relative posix path, always starting with `/`.
    pub path: String,
    /// Formatted size, `null` for folders.
    pub size: Option<String>,
    /// Last-modified day as `YYYY-MM-DD` (UTC).
    pub modified: String,
}

impl MediaEntry {
    /// Build an entry for a directory.
    pub fn folder(name: String, path: String, modified: SystemTime) -> Self {
        Self {
            name,
            kind: MediaKind::Folder,
            path,
            size: None,
            modified: format_date(modified),
        }
    }

    /// Build an entry for a regular file, classifying it by extension.
    pub fn file(name: String, path: String, len: u64, modified: SystemTime) -> Self {
        let kind = MediaKind::from_file_name(&name);
        Self {
            name,
            kind,
            path,
            size: Some(format_size(len)),
            modified: format_date(modified),
        }
    }
}

/// A directory listing as returned by the browse endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Normalized root-relative path of the listed directory.
    pub current_path: String,
    pub items: Vec<MediaEntry>,
}

/// Sort entries folders-first, then case-insensitively by name.
///
/// Names that differ only in case fall back to byte order so the result does
/// not depend on the input order.
pub fn sort_entries(entries: &mut [MediaEntry]) {
    entries.sort_by(|a, b| {
        b.kind
            .is_folder()
            .cmp(&a.kind.is_folder())
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Format a byte count with one decimal in the largest unit that keeps the
/// value at or above 1, e.g. `1536` becomes `1.5 KB`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".into();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{value:.1} {}", SIZE_UNITS[unit])
}

/// Render a modification time as a UTC calendar day.
pub fn format_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format("%Y-%m-%d").to_string()
}

/// MIME type sent as `Content-Type` for a file.
pub fn content_type(path: impl AsRef<Path>) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn entry(name: &str, kind: MediaKind) -> MediaEntry {
        MediaEntry {
            name: name.into(),
            kind,
            path: format!("/{name}"),
            size: None,
            modified: "2024-01-01".into(),
        }
    }

    #[test]
    fn format_size_examples() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1), "1.0 B");
        assert_eq!(format_size(1023), "1023.0 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1_048_576), "1.0 MB");
        assert_eq!(format_size(1_073_741_824), "1.0 GB");
        assert_eq!(format_size(1_099_511_627_776), "1.0 TB");
    }

    #[test]
    fn format_size_caps_at_terabytes() {
        assert_eq!(format_size(1024 * 1_099_511_627_776), "1024.0 TB");
    }

    #[test]
    fn classify_by_extension() {
        assert_eq!(MediaKind::from_file_name("film.mp4"), MediaKind::Video);
        assert_eq!(MediaKind::from_file_name("film.MKV"), MediaKind::Video);
        assert_eq!(MediaKind::from_file_name("clip.webm"), MediaKind::Video);
        assert_eq!(MediaKind::from_file_name("poster.jpg"), MediaKind::Image);
        assert_eq!(MediaKind::from_file_name("poster.png"), MediaKind::Image);
        assert_eq!(MediaKind::from_file_name("song.mp3"), MediaKind::Audio);
        assert_eq!(MediaKind::from_file_name("song.flac"), MediaKind::Audio);
        assert_eq!(MediaKind::from_file_name("notes.txt"), MediaKind::File);
        assert_eq!(MediaKind::from_file_name("README"), MediaKind::File);
        assert_eq!(MediaKind::from_file_name("blob.zzzunknown"), MediaKind::File);
    }

    #[test]
    fn content_type_defaults_to_octet_stream() {
        assert_eq!(content_type("film.mp4"), "video/mp4");
        assert_eq!(content_type("README"), "application/octet-stream");
    }

    #[test]
    fn format_date_is_utc_day() {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        assert_eq!(format_date(time), "2023-11-14");
    }

    #[test]
    fn sort_puts_folders_first_then_name() {
        let mut entries = vec![
            entry("b.mp4", MediaKind::Video),
            entry("A", MediaKind::Folder),
            entry("a.txt", MediaKind::File),
        ];
        sort_entries(&mut entries);
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["A", "a.txt", "b.mp4"]);
    }

    #[test]
    fn sort_is_case_insensitive_and_total() {
        let mut forward = vec![
            entry("beta", MediaKind::File),
            entry("Alpha", MediaKind::File),
            entry("alpha", MediaKind::File),
            entry("zeta", MediaKind::Folder),
        ];
        let mut backward: Vec<_> = forward.iter().rev().cloned().collect();
        sort_entries(&mut forward);
        sort_entries(&mut backward);

        let names: Vec<_> = forward.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["zeta", "Alpha", "alpha", "beta"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn entry_json_shape() {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let file = MediaEntry::file("a.mp4".into(), "/a.mp4".into(), 1536, time);
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "a.mp4",
                "type": "video",
                "path": "/a.mp4",
                "size": "1.5 KB",
                "modified": "2023-11-14",
            })
        );

        let folder = MediaEntry::folder("Movies".into(), "/Movies".into(), time);
        let json = serde_json::to_value(&folder).unwrap();
        assert_eq!(json["type"], "folder");
        assert!(json["size"].is_null());
    }

    #[test]
    fn listing_uses_camel_case() {
        let listing = Listing {
            current_path: "/".into(),
            items: vec![],
        };
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["currentPath"], "/");
        assert!(json["items"].as_array().unwrap().is_empty());
    }
}
