//! Error types for the guji index client
//!
//! Per-mirror failures are recovered locally by the fetchers; only whole-catalog
//! and whole-content unavailability reach consumers. Lookup misses are never
//! errors, they are `Option::None`.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::app::models::RepoKind;

/// Failure of a single mirror candidate
#[derive(Error, Debug)]
pub enum MirrorError {
    /// The attempt exceeded its timeout
    #[error("Mirror {url} timed out after {}ms", timeout.as_millis())]
    Timeout { url: String, timeout: Duration },

    /// The mirror answered with a non-2xx status
    #[error("Mirror {url} responded with HTTP {status} {reason}")]
    HttpStatus {
        url: String,
        status: u16,
        reason: String,
    },

    /// Connection, TLS or body transfer failed
    #[error("Transport error contacting {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl MirrorError {
    /// URL of the candidate that failed
    pub fn url(&self) -> &str {
        match self {
            MirrorError::Timeout { url, .. }
            | MirrorError::HttpStatus { url, .. }
            | MirrorError::Transport { url, .. } => url,
        }
    }

    /// HTTP status if the mirror responded at all
    pub fn status(&self) -> Option<u16> {
        match self {
            MirrorError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Index document retrieval errors
#[derive(Error, Debug)]
pub enum IndexError {
    /// Every mirror candidate failed
    #[error("All {attempts} mirrors failed for the {repo} index; last error: {reason}")]
    AllMirrorsFailed {
        repo: RepoKind,
        attempts: usize,
        reason: String,
    },

    /// The body was fetched but is not a valid catalog document
    #[error("Malformed index document from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },
}

/// Merged catalog errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Neither the draft nor the official catalog yielded any items
    #[error("Catalog unavailable. Draft: {draft}. Official: {official}")]
    Unavailable { draft: String, official: String },
}

/// Markdown content retrieval errors
#[derive(Error, Debug)]
pub enum ContentError {
    /// Both content mirrors failed
    #[error("Content unavailable for {path}: {reason}")]
    Unavailable { path: String, reason: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// HTTP client could not be built from the configuration
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),
}

impl ConfigError {
    /// Shorthand for [`ConfigError::InvalidValue`]
    pub fn invalid(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Top-level error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Index retrieval error
    #[error(transparent)]
    Index(#[from] IndexError),

    /// Catalog error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Content error
    #[error(transparent)]
    Content(#[from] ContentError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Check if retrying later could succeed (mirror outages are transient)
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Index(IndexError::AllMirrorsFailed { .. })
            | AppError::Catalog(CatalogError::Unavailable { .. })
            | AppError::Content(ContentError::Unavailable { .. }) => true,

            AppError::Index(IndexError::MalformedResponse { .. }) | AppError::Config(_) => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Index(_) => "index",
            AppError::Catalog(_) => "catalog",
            AppError::Content(_) => "content",
            AppError::Config(_) => "config",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Single mirror attempt result type alias
pub type MirrorResult<T> = std::result::Result<T, MirrorError>;

/// Index result type alias
pub type IndexResult<T> = std::result::Result<T, IndexError>;

/// Catalog result type alias
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Content result type alias
pub type ContentResult<T> = std::result::Result<T, ContentError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
