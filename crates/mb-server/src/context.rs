//! Application context shared by all route handlers via Axum state.

use std::sync::Arc;

use mb_core::config::Config;
use mb_core::MediaRoot;

/// Application context shared by all request handlers (via Axum state).
///
/// This is cheaply cloneable because it only holds `Arc`s. Nothing in it is
/// mutated after startup.
#[derive(Clone)]
pub struct AppContext {
    /// Immutable application configuration snapshot.
    pub config: Arc<Config>,
    /// Sandbox every requested path is resolved through.
    pub root: Arc<MediaRoot>,
}

impl AppContext {
    /// Open the configured media root and build the context.
    pub fn new(config: Config) -> mb_core::Result<Self> {
        let root = MediaRoot::open(&config.media.root)?;
        Ok(Self {
            config: Arc::new(config),
            root: Arc::new(root),
        })
    }

    /// Bounded fan-out used when stat-ing directory children.
    pub fn listing_concurrency(&self) -> usize {
        self.config.media.listing_concurrency.max(1)
    }
}
