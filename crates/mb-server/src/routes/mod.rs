pub mod browse;
pub mod health;
pub mod stream;
pub mod streaming_helpers;
