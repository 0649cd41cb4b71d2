// Public modules
pub mod annotate;
pub mod catalog;
pub mod classify;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod http;
pub mod report;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
