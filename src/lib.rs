//! Guji Index Library
//!
//! Retrieves the catalog of digitized classical Chinese books from the
//! draft and official index repositories, merges them with official entries
//! taking precedence, and serves lookup, search and Markdown content through
//! an ordered list of CDN mirrors.

pub mod app;
pub mod config;
pub mod constants;
pub mod errors;
pub mod logging;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
