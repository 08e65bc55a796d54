//! Byte streaming routes: inline playback with range support, and
//! whole-file downloads.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap};
use axum::response::Response;
use axum::Extension;

use crate::context::AppContext;
use crate::error::AppError;
use crate::middleware::request_id::RequestId;
use crate::sandbox::ensure_within_root;

use super::streaming_helpers::{serve_attachment, serve_file_streaming};

/// GET /api/stream/{*path}
///
/// Serve a file for inline playback with HTTP range request support.
#[utoipa::path(
    get,
    path = "/api/stream/{path}",
    params(
        ("path" = String, Path, description = "File path relative to the media root"),
        ("Range" = Option<String>, Header, description = "Single byte range, e.g. bytes=0-1023"),
    ),
    responses(
        (status = 200, description = "Entire file"),
        (status = 206, description = "Requested byte window"),
        (status = 400, description = "Path is a directory"),
        (status = 403, description = "Path or symlink target escapes the media root"),
        (status = 404, description = "File not found"),
        (status = 416, description = "Range not satisfiable"),
    ),
    tag = "stream"
)]
pub async fn stream_file(
    State(ctx): State<AppContext>,
    Extension(request_id): Extension<RequestId>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let range_header = headers.get(header::RANGE).map(|v| v.to_str().unwrap_or(""));

    let result = async {
        let file_path = ctx.root.resolve(&path)?;
        let rel = ctx.root.relative(&path)?;
        ensure_within_root(&ctx.root, &file_path, "file", &rel).await?;
        serve_file_streaming(&file_path, &rel, range_header).await
    }
    .await;

    result.map_err(|e| AppError::new(e).with_request_id(&request_id))
}

/// GET /api/download/{*path}
///
/// Send the whole file as an attachment.
#[utoipa::path(
    get,
    path = "/api/download/{path}",
    params(("path" = String, Path, description = "File path relative to the media root")),
    responses(
        (status = 200, description = "File sent with Content-Disposition: attachment"),
        (status = 400, description = "Path is a directory"),
        (status = 403, description = "Path or symlink target escapes the media root"),
        (status = 404, description = "File not found"),
    ),
    tag = "stream"
)]
pub async fn download_file(
    State(ctx): State<AppContext>,
    Extension(request_id): Extension<RequestId>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let result = async {
        let file_path = ctx.root.resolve(&path)?;
        let rel = ctx.root.relative(&path)?;
        ensure_within_root(&ctx.root, &file_path, "file", &rel).await?;
        serve_attachment(&file_path, &rel).await
    }
    .await;

    result.map_err(|e| AppError::new(e).with_request_id(&request_id))
}
