//! Source adapters — one per external data source.
//!
//! An adapter lists candidate item IDs and fetches raw payloads one at a
//! time. Fetch is retry-safe: a failure for one ID never invalidates the
//! batch. Normalization happens downstream; adapters hand back raw
//! `serde_json::Value` payloads untouched.

pub mod met;
pub mod news;
pub mod unesco;

pub use met::MetMuseumAdapter;
pub use news::NewsMonitor;
pub use unesco::UnescoAdapter;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// User agent sent on every outbound request.
pub const USER_AGENT: &str = "Digital-Alexandria-Heritage-Collector/1.0";

/// Per-request timeout for all source APIs.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Source adapter errors
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Invalid payload: {0}")]
    Payload(String),

    #[error("All {attempts} retry attempts failed for item {id}")]
    RetryExhausted { id: String, attempts: usize },

    #[error("Missing API key")]
    MissingApiKey,
}

/// Which normalization rules apply to this adapter's payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Museum catalog: artifact-level scoring, location-based threat rules.
    Museum,
    /// Heritage-site registry: inscription-age scoring, danger-list threat
    /// rules.
    Registry,
}

/// Abstraction over heritage data sources.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Adapter name, recorded as the `source` of every record it yields.
    fn name(&self) -> &str;

    fn kind(&self) -> SourceKind;

    /// Ordered, finite sequence of opaque item IDs. May be truncated to a
    /// configured cap by the caller.
    async fn list_candidate_ids(&self) -> Result<Vec<String>, SourceError>;

    /// Fetch one raw payload by ID.
    async fn fetch(&self, id: &str) -> Result<serde_json::Value, SourceError>;
}

pub(crate) fn http_client() -> Result<reqwest::Client, SourceError> {
    Ok(reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(HTTP_TIMEOUT)
        .build()?)
}
