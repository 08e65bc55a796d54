//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates a temporary media root, default
//! config and a full [`AppContext`]. Requests can be driven in-process with
//! [`TestHarness::get`] or over a real socket via [`TestHarness::with_server`].

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use mb_core::config::Config;
use mb_server::context::AppContext;
use mb_server::router::build_router;

/// Response pieces collected from an in-process request.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }
}

/// Test harness wrapping an [`AppContext`] over a temporary media root.
pub struct TestHarness {
    pub ctx: AppContext,
    /// Keeps the directory alive; the media root is `root/media`.
    pub dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new harness with an empty media root.
    ///
    /// The root is a `media` subdirectory so tests can place files next to it
    /// that must never be reachable.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = dir.path().join("media");
        std::fs::create_dir(&root).expect("failed to create media root");

        let mut config = Config::default();
        config.media.root = root;
        config.media.listing_concurrency = 4;

        let ctx = AppContext::new(config).expect("failed to build context");
        Self { ctx, dir }
    }

    /// Canonical media root.
    pub fn root(&self) -> &Path {
        self.ctx.root.path()
    }

    /// Directory that contains the media root (outside the sandbox).
    pub fn outside(&self) -> PathBuf {
        self.root().parent().expect("root has a parent").to_path_buf()
    }

    /// Write a file under the media root, creating parent directories.
    pub fn write_file(&self, rel: &str, contents: &[u8]) -> PathBuf {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent");
        }
        std::fs::write(&path, contents).expect("failed to write file");
        path
    }

    /// Create a directory under the media root.
    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.root().join(rel);
        std::fs::create_dir_all(&path).expect("failed to create dir");
        path
    }

    /// Issue a GET against the router in-process.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.get_with(uri, &[]).await
    }

    /// Issue a GET with extra headers against the router in-process.
    pub async fn get_with(&self, uri: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(Body::empty()).expect("failed to build request");

        let response = build_router(self.ctx.clone())
            .oneshot(request)
            .await
            .expect("router failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new();
        let app = build_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }
}

/// Deterministic, non-repeating-looking test payload.
pub fn payload(len: usize) -> Vec<u8> {
    (0..=255u8).cycle().take(len).collect()
}
