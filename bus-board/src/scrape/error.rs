//! Error types for the timetable scraper.

use std::io;

/// Errors from fetching, parsing or writing timetable pages.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Selector failed to compile
    #[error("invalid selector {selector:?}: {message}")]
    Selector {
        selector: &'static str,
        message: String,
    },

    /// Output could not be written
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Output could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
