//! Document client for the timetable and holiday sources.

use std::fmt;
use std::path::PathBuf;

use super::error::ScheduleError;
use super::types::{HolidayCalendar, Timetable};

/// Where a schedule document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Fetched over HTTP(S)
    Url(String),
    /// Read from the local filesystem
    File(PathBuf),
}

impl DocumentSource {
    /// Interpret a configured location: `http://` and `https://` are URLs,
    /// anything else is a file path.
    pub fn parse(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            DocumentSource::Url(s.to_string())
        } else {
            DocumentSource::File(PathBuf::from(s))
        }
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSource::Url(url) => f.write_str(url),
            DocumentSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Configuration for the schedule client.
#[derive(Debug, Clone)]
pub struct ScheduleClientConfig {
    /// Timetable document location
    pub timetable: DocumentSource,
    /// Holiday calendar document location
    pub holidays: DocumentSource,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ScheduleClientConfig {
    /// Create a new config with the given sources.
    pub fn new(timetable: DocumentSource, holidays: DocumentSource) -> Self {
        Self {
            timetable,
            holidays,
            timeout_secs: 30,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client that fetches and parses the two schedule documents.
#[derive(Debug, Clone)]
pub struct ScheduleClient {
    http: reqwest::Client,
    timetable: DocumentSource,
    holidays: DocumentSource,
}

impl ScheduleClient {
    /// Create a new schedule client.
    pub fn new(config: ScheduleClientConfig) -> Result<Self, ScheduleError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            timetable: config.timetable,
            holidays: config.holidays,
        })
    }

    /// Timetable document location.
    pub fn timetable_source(&self) -> &DocumentSource {
        &self.timetable
    }

    /// Holiday calendar document location.
    pub fn holidays_source(&self) -> &DocumentSource {
        &self.holidays
    }

    /// Fetch and validate the timetable.
    ///
    /// Lists that are not in chronological order are rejected rather than
    /// re-sorted.
    pub async fn fetch_timetable(&self) -> Result<Timetable, ScheduleError> {
        let body = self.fetch(&self.timetable).await?;
        let timetable: Timetable =
            serde_json::from_str(&body).map_err(|e| ScheduleError::Json {
                message: e.to_string(),
            })?;
        timetable.check_sorted()?;
        Ok(timetable)
    }

    /// Fetch the holiday calendar.
    pub async fn fetch_holidays(&self) -> Result<HolidayCalendar, ScheduleError> {
        let body = self.fetch(&self.holidays).await?;
        serde_json::from_str(&body).map_err(|e| ScheduleError::Json {
            message: e.to_string(),
        })
    }

    async fn fetch(&self, source: &DocumentSource) -> Result<String, ScheduleError> {
        match source {
            DocumentSource::Url(url) => {
                let response = self.http.get(url).send().await?;
                let status = response.status();

                if !status.is_success() {
                    return Err(ScheduleError::Status {
                        source_name: url.clone(),
                        status: status.as_u16(),
                    });
                }

                Ok(response.text().await?)
            }
            DocumentSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| ScheduleError::Io {
                        path: path.display().to_string(),
                        source: e,
                    })
            }
        }
    }
}
