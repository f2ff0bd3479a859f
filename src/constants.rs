//! Application constants for the guji index client
//!
//! This module centralizes all constants used throughout the crate,
//! organized by functional domain.

use std::time::Duration;

/// Catalog origin: organisation, repositories and branch
pub mod origin {
    /// GitHub organisation owning both catalog repositories
    pub const ORG: &str = "open-guji";

    /// Repository holding the unreviewed (draft) catalog
    pub const DRAFT_REPO: &str = "book-index-draft";

    /// Repository holding the reviewed (official) catalog
    pub const OFFICIAL_REPO: &str = "book-index";

    /// Branch every resource is read from
    pub const BRANCH: &str = "main";

    /// Index document path relative to the repository root
    pub const INDEX_FILE: &str = "index.json";
}

/// Mirror base URLs
pub mod mirrors {
    /// jsDelivr edge network (Fastly), lowest latency
    pub const JSDELIVR_EDGE: &str = "https://fastly.jsdelivr.net/gh";

    /// jsDelivr default CDN
    pub const JSDELIVR_CDN: &str = "https://cdn.jsdelivr.net/gh";

    /// GitHub raw content host, the canonical origin
    pub const GITHUB_RAW: &str = "https://raw.githubusercontent.com";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("guji-index/", env!("CARGO_PKG_VERSION"));

    /// Upper bound for a single request; per-attempt timeouts are shorter
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum idle connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 4;
}

/// Per-attempt fetch timeouts and request pacing
pub mod limits {
    use super::Duration;

    /// Timeout for each index mirror attempt
    pub const INDEX_TIMEOUT: Duration = Duration::from_secs(5);

    /// Timeout for the primary content mirror
    pub const CONTENT_PRIMARY_TIMEOUT: Duration = Duration::from_secs(8);

    /// Timeout for the secondary content mirror
    pub const CONTENT_FALLBACK_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default request rate towards the mirrors (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 10;

    /// Maximum jitter added by the rate limiter
    pub const RATE_LIMIT_JITTER: Duration = Duration::from_millis(50);
}

/// Display labels shown by consumers
pub mod labels {
    /// Label for [`crate::app::ResourceType::Work`]
    pub const WORK: &str = "作品";

    /// Label for [`crate::app::ResourceType::Collection`]
    pub const COLLECTION: &str = "丛编";

    /// Label for [`crate::app::ResourceType::Book`]
    pub const BOOK: &str = "书";

    /// Label for draft items
    pub const DRAFT: &str = "草稿";

    /// Label for official items
    pub const OFFICIAL: &str = "正式";
}

/// Configuration file locations
pub mod config {
    /// Project-local configuration file name
    pub const LOCAL_CONFIG_FILE: &str = "guji-index.toml";

    /// Directory name under the user config directory
    pub const APP_DIR: &str = "guji-index";

    /// Configuration file name inside [`APP_DIR`]
    pub const CONFIG_FILE: &str = "config.toml";
}

/// Logging constants
pub mod logging {
    /// Default log level
    pub const DEFAULT_LOG_LEVEL: &str = "info";

    /// Target used for the crate-level filter directive
    pub const CRATE_TARGET: &str = "guji_index";
}

pub use http::USER_AGENT;
pub use limits::{CONTENT_FALLBACK_TIMEOUT, CONTENT_PRIMARY_TIMEOUT, INDEX_TIMEOUT};
pub use origin::{BRANCH, ORG};
