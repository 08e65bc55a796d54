//! mb-core: shared types, errors, configuration, and the media-root sandbox.
//!
//! This crate is the foundational dependency for the server crate, providing
//! a unified error type, application configuration, path resolution confined
//! to a single media root, and media classification helpers.

pub mod config;
pub mod error;
pub mod media;
pub mod paths;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use media::*;
pub use paths::MediaRoot;
