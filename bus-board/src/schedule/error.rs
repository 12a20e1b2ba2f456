//! Schedule loading error types.

use crate::domain::{DayType, StationId};

/// Errors that can occur when loading a timetable or holiday document.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Source returned an error status
    #[error("{source_name} returned HTTP {status}")]
    Status { source_name: String, status: u16 },

    /// Failed to read a local document
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse document JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// A departure list is not in chronological order
    #[error("{station}/{day_type} departures are not sorted (entry {index} is earlier than the one before it)")]
    Unsorted {
        station: StationId,
        day_type: DayType,
        index: usize,
    },
}
