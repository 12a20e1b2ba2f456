//! Server configuration.
//!
//! Every setting has a default matching the reference deployment (two
//! stations, files under `data/`). Each can be overridden with a
//! `BUS_BOARD_*` environment variable.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::board::{BoardSettings, StationConfig};
use crate::domain::StationId;
use crate::schedule::{DocumentSource, ScheduleClientConfig};

/// Errors from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but its value is unusable
    #[error("invalid {key}={value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Configuration for the departure board server.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,

    /// Timetable document location (URL or file).
    pub timetable_source: DocumentSource,

    /// Holiday calendar document location (URL or file).
    pub holidays_source: DocumentSource,

    /// Directory served under `/static`.
    pub static_dir: PathBuf,

    /// Stations shown on the board, in display order.
    pub stations: Vec<StationConfig>,

    /// Selection and highlighting parameters.
    pub settings: BoardSettings,

    /// How often the clock and day type are re-evaluated.
    pub clock_interval: Duration,

    /// How often departures are recomputed.
    pub departures_interval: Duration,

    /// Document fetch timeout (seconds).
    pub timeout_secs: u64,

    /// Default log filter directive (overridden by `RUST_LOG`).
    pub log_level: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            timetable_source: DocumentSource::parse("data/bus_timetable.json"),
            holidays_source: DocumentSource::parse("data/holidays.json"),
            static_dir: PathBuf::from("static"),
            stations: default_stations(),
            settings: BoardSettings::default(),
            clock_interval: Duration::from_secs(1),
            departures_interval: Duration::from_secs(30),
            timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

impl BoardConfig {
    /// Read configuration from `BUS_BOARD_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = lookup("BUS_BOARD_ADDR") {
            config.bind_addr = parse_value("BUS_BOARD_ADDR", &v)?;
        }
        if let Some(v) = lookup("BUS_BOARD_TIMETABLE") {
            config.timetable_source = DocumentSource::parse(&v);
        }
        if let Some(v) = lookup("BUS_BOARD_HOLIDAYS") {
            config.holidays_source = DocumentSource::parse(&v);
        }
        if let Some(v) = lookup("BUS_BOARD_STATIC_DIR") {
            config.static_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("BUS_BOARD_STATIONS") {
            config.stations = parse_stations(&v)?;
        }
        if let Some(v) = lookup("BUS_BOARD_UPCOMING") {
            let count: usize = parse_value("BUS_BOARD_UPCOMING", &v)?;
            if count == 0 {
                return Err(invalid("BUS_BOARD_UPCOMING", &v, "must be at least 1"));
            }
            config.settings.upcoming_count = count;
        }
        if let Some(v) = lookup("BUS_BOARD_URGENT_MINS") {
            config.settings.urgent_threshold_mins = parse_value("BUS_BOARD_URGENT_MINS", &v)?;
        }
        if let Some(v) = lookup("BUS_BOARD_CLOCK_SECS") {
            config.clock_interval = parse_secs("BUS_BOARD_CLOCK_SECS", &v)?;
        }
        if let Some(v) = lookup("BUS_BOARD_DEPARTURES_SECS") {
            config.departures_interval = parse_secs("BUS_BOARD_DEPARTURES_SECS", &v)?;
        }
        if let Some(v) = lookup("BUS_BOARD_TIMEOUT_SECS") {
            config.timeout_secs = parse_value("BUS_BOARD_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("BUS_BOARD_LOG") {
            config.log_level = v;
        }

        Ok(config)
    }

    /// Set the stations shown on the board.
    pub fn with_stations(mut self, stations: Vec<StationConfig>) -> Self {
        self.stations = stations;
        self
    }

    /// Set the document sources.
    pub fn with_sources(mut self, timetable: DocumentSource, holidays: DocumentSource) -> Self {
        self.timetable_source = timetable;
        self.holidays_source = holidays;
        self
    }

    /// Client configuration for the schedule documents.
    pub fn client_config(&self) -> ScheduleClientConfig {
        ScheduleClientConfig::new(self.timetable_source.clone(), self.holidays_source.clone())
            .with_timeout(self.timeout_secs)
    }
}

fn default_stations() -> Vec<StationConfig> {
    [("chigasaki", "茅ヶ崎駅"), ("tsujido", "辻堂駅")]
        .into_iter()
        .filter_map(|(id, name)| {
            StationId::parse(id)
                .ok()
                .map(|id| StationConfig::new(id, name))
        })
        .collect()
}

/// Parse a station list: `id=name,id=name`. A bare `id` uses the id as name.
pub fn parse_stations(s: &str) -> Result<Vec<StationConfig>, ConfigError> {
    const KEY: &str = "BUS_BOARD_STATIONS";

    let stations = s
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (id, name) = entry.split_once('=').unwrap_or((entry, entry));
            let id = StationId::parse(id.trim()).map_err(|e| invalid(KEY, s, e.to_string()))?;
            Ok(StationConfig::new(id, name.trim()))
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;

    if stations.is_empty() {
        return Err(invalid(KEY, s, "no stations listed"));
    }
    Ok(stations)
}

fn parse_value<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| invalid(key, value, e.to_string()))
}

fn parse_secs(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = parse_value(key, value)?;
    if secs == 0 {
        return Err(invalid(key, value, "must be at least 1 second"));
    }
    Ok(Duration::from_secs(secs))
}

fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.into(),
    }
}
