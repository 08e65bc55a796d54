//! Axum router construction.
//!
//! Builds the full application router with all route groups and middleware
//! layers.

use axum::middleware;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::context::AppContext;
use crate::middleware::request_id::request_id_middleware;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::browse::browse,
        routes::stream::stream_file,
        routes::stream::download_file,
        routes::health::health_check,
    ),
    components(schemas(
        mb_core::Listing,
        mb_core::MediaEntry,
        mb_core::MediaKind,
        routes::health::HealthResponse,
    ))
)]
pub struct ApiDoc;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let api = Router::new()
        // Browse. The wildcard does not match an empty tail, so the root
        // listing needs its own routes.
        .route("/browse", get(routes::browse::browse_root))
        .route("/browse/", get(routes::browse::browse_root))
        .route("/browse/{*path}", get(routes::browse::browse))
        // Streaming
        .route("/stream/{*path}", get(routes::stream::stream_file))
        .route("/download/{*path}", get(routes::stream::download_file))
        .route("/health", get(routes::health::health_check));

    // Handlers extract `Extension<RequestId>`; this layer must wrap them all.
    Router::new()
        .nest("/api", api)
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
