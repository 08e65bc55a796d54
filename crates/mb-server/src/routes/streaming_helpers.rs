//! Shared streaming helpers: range parsing, file opening, and chunked file
//! serving via `ReaderStream`.
//!
//! Bodies are read in 64KB chunks so memory stays bounded regardless of file
//! size. When the client goes away hyper drops the body stream, which drops
//! the file handle with it.

use std::path::Path;

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use mb_core::{content_type, Error, Result};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

/// Read size for streamed bodies.
pub const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// A single-range `Range` header, before it is checked against a file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    /// `bytes=START-` or `bytes=START-END`.
    From { start: u64, end: Option<u64> },
    /// `bytes=-N`: the last N bytes.
    Suffix(u64),
}

/// An inclusive byte window inside a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes in the window; never zero.
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Parse a `Range: bytes=START-END` header value.
///
/// Supports formats:
/// - bytes=0-499
/// - bytes=500-
/// - bytes=-500 (last 500 bytes)
///
/// Multi-range values (`bytes=0-1,5-6`) are rejected.
pub fn parse_range_header(value: &str) -> Option<RangeSpec> {
    let spec = value.trim().strip_prefix("bytes=")?;
    if spec.contains(',') {
        return None;
    }

    let (start, end) = spec.split_once('-')?;
    let (start, end) = (start.trim(), end.trim());

    match (start.is_empty(), end.is_empty()) {
        (true, false) => Some(RangeSpec::Suffix(end.parse().ok()?)),
        (false, true) => Some(RangeSpec::From {
            start: start.parse().ok()?,
            end: None,
        }),
        (false, false) => Some(RangeSpec::From {
            start: start.parse().ok()?,
            end: Some(end.parse().ok()?),
        }),
        (true, true) => None,
    }
}

impl RangeSpec {
    /// Check the range against a file of `size` bytes.
    ///
    /// An end past the last byte is clamped. Returns `None` when no byte of
    /// the file is selected (`start >= size`, `start > end`, empty suffix).
    pub fn resolve(self, size: u64) -> Option<ByteRange> {
        if size == 0 {
            return None;
        }
        let last = size - 1;

        match self {
            RangeSpec::From { start, end } => {
                let end = end.unwrap_or(last).min(last);
                if start > end {
                    return None;
                }
                Some(ByteRange { start, end })
            }
            RangeSpec::Suffix(0) => None,
            RangeSpec::Suffix(len) => Some(ByteRange {
                start: size.saturating_sub(len),
                end: last,
            }),
        }
    }
}

/// Open a file under the root for reading.
///
/// Missing files are [`Error::NotFound`], directories are
/// [`Error::Validation`]. The metadata comes from the open handle so it
/// describes exactly the file that will be streamed.
pub async fn open_file(path: &Path, rel: &str) -> Result<(File, std::fs::Metadata)> {
    let file = File::open(path)
        .await
        .map_err(|e| Error::from_io(e, "file", rel))?;
    let metadata = file.metadata().await?;

    if metadata.is_dir() {
        return Err(Error::Validation(format!("'{rel}' is a directory")));
    }

    Ok((file, metadata))
}

/// Serve a file using chunked streaming via `ReaderStream`.
///
/// Without a `Range` header the whole file is sent with 200. With one, the
/// selected window is sent with 206, or the request fails with
/// [`Error::RangeNotSatisfiable`] if the header is malformed or selects
/// nothing.
pub async fn serve_file_streaming(
    file_path: &Path,
    rel: &str,
    range_header: Option<&str>,
) -> Result<Response> {
    let (mut file, metadata) = open_file(file_path, rel).await?;
    let file_size = metadata.len();
    let content_type = content_type(file_path);

    let Some(raw) = range_header else {
        tracing::debug!(path = %rel, size = file_size, "Streaming full file");
        let body = Body::from_stream(ReaderStream::with_capacity(file, STREAM_CHUNK_SIZE));
        return Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CONTENT_LENGTH, file_size)
            .header(header::ACCEPT_RANGES, "bytes")
            .body(body)
            .map_err(|e| Error::Internal(format!("Failed to build response: {e}")));
    };

    let range = parse_range_header(raw)
        .and_then(|spec| spec.resolve(file_size))
        .ok_or_else(|| Error::range_not_satisfiable(raw, file_size))?;

    tracing::debug!(
        path = %rel,
        start = range.start,
        end = range.end,
        size = file_size,
        "Streaming byte range"
    );

    file.seek(std::io::SeekFrom::Start(range.start)).await?;

    // Wrap in a Take to limit reads to exactly `range.length()` bytes.
    let limited = file.take(range.length());
    let body = Body::from_stream(ReaderStream::with_capacity(limited, STREAM_CHUNK_SIZE));

    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_RANGE,
            format!("bytes {}-{}/{file_size}", range.start, range.end),
        )
        .header(header::CONTENT_LENGTH, range.length())
        .header(header::ACCEPT_RANGES, "bytes")
        .body(body)
        .map_err(|e| Error::Internal(format!("Failed to build response: {e}")))
}

/// Serve a whole file as a download.
pub async fn serve_attachment(file_path: &Path, rel: &str) -> Result<Response> {
    let (file, metadata) = open_file(file_path, rel).await?;

    let file_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| Error::Validation(format!("'{rel}' has no file name")))?;

    let disposition = HeaderValue::from_str(&content_disposition(&file_name))
        .map_err(|e| Error::Internal(format!("Invalid Content-Disposition: {e}")))?;

    tracing::debug!(path = %rel, size = metadata.len(), "Sending attachment");

    let body = Body::from_stream(ReaderStream::with_capacity(file, STREAM_CHUNK_SIZE));
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type(file_path))
        .header(header::CONTENT_LENGTH, metadata.len())
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(body)
        .map_err(|e| Error::Internal(format!("Failed to build response: {e}")))
}

/// Build an `attachment` disposition for `file_name`.
///
/// `filename` carries an ASCII-safe fallback; `filename*` carries the exact
/// name percent-encoded as UTF-8 (RFC 5987).
pub fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if fallback == file_name {
        format!("attachment; filename=\"{file_name}\"")
    } else {
        format!(
            "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
            encode_ext_value(file_name)
        )
    }
}

fn encode_ext_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'!'
            | b'#'
            | b'$'
            | b'&'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
