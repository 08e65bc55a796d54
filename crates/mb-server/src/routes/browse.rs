//! Directory browsing routes.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use mb_core::Listing;

use crate::context::AppContext;
use crate::error::AppError;
use crate::listing::list_directory;
use crate::middleware::request_id::RequestId;

/// GET /api/browse
pub async fn browse_root(
    State(ctx): State<AppContext>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Json<Listing>, AppError> {
    list(&ctx, "", &request_id).await
}

/// GET /api/browse/{*path}
#[utoipa::path(
    get,
    path = "/api/browse/{path}",
    params(("path" = String, Path, description = "Directory path relative to the media root")),
    responses(
        (status = 200, description = "Directory listing", body = Listing),
        (status = 400, description = "Path is not a directory"),
        (status = 403, description = "Path escapes the media root"),
        (status = 404, description = "Directory not found"),
    ),
    tag = "browse"
)]
pub async fn browse(
    State(ctx): State<AppContext>,
    Extension(request_id): Extension<RequestId>,
    Path(path): Path<String>,
) -> Result<Json<Listing>, AppError> {
    list(&ctx, &path, &request_id).await
}

async fn list(
    ctx: &AppContext,
    path: &str,
    request_id: &RequestId,
) -> Result<Json<Listing>, AppError> {
    list_directory(&ctx.root, path, ctx.listing_concurrency())
        .await
        .map(Json)
        .map_err(|e| AppError::new(e).with_request_id(request_id))
}
