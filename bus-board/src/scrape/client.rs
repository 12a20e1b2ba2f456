//! Fetching timetable pages and writing the generated documents.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ConfigError;
use crate::domain::StationId;
use crate::schedule::Timetable;

use super::error::ScrapeError;
use super::page::parse_timetable_page;

/// The pages only render the timetable for mobile browsers.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1";

const PAGES_KEY: &str = "BUS_BOARD_SCRAPE_PAGES";
const OUTPUT_KEY: &str = "BUS_BOARD_TIMETABLE";
const TIMEOUT_KEY: &str = "BUS_BOARD_TIMEOUT_SECS";
const HOLIDAYS_KEY: &str = "BUS_BOARD_HOLIDAYS";
const HOLIDAY_MONTHS_KEY: &str = "BUS_BOARD_HOLIDAY_MONTHS";
const LOG_KEY: &str = "BUS_BOARD_LOG";

/// Timetable pages for the stations the board shows by default.
pub fn default_pages() -> Vec<(StationId, String)> {
    [
        (
            "chigasaki",
            "https://www.kanachu.co.jp/sp/diagram/timetable01?cs=0000802161-6&nid=00127236",
        ),
        (
            "tsujido",
            "https://www.kanachu.co.jp/sp/diagram/timetable01?cs=0000801834-12&nid=00127236",
        ),
    ]
    .into_iter()
    .filter_map(|(id, url)| StationId::parse(id).ok().map(|id| (id, url.to_string())))
    .collect()
}

/// Configuration for the document generators.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Station id and timetable page URL, in order
    pub pages: Vec<(StationId, String)>,
    /// Where the timetable document is written
    pub output: PathBuf,
    /// Where the holiday calendar is written
    pub holidays_output: PathBuf,
    /// How many months ahead of today the holiday calendar covers
    pub holiday_months: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User agent sent with each request
    pub user_agent: String,
    /// Default log filter directive (overridden by `RUST_LOG`)
    pub log_level: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            pages: default_pages(),
            output: PathBuf::from("data/bus_timetable.json"),
            holidays_output: PathBuf::from("data/holidays.json"),
            holiday_months: 6,
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl ScrapeConfig {
    /// Read configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// Pages are given as `id=url,id=url`. The outputs share
    /// `BUS_BOARD_TIMETABLE` and `BUS_BOARD_HOLIDAYS` with the server and
    /// must be file paths.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = lookup(PAGES_KEY) {
            config.pages = parse_pages(&v)?;
        }
        if let Some(v) = lookup(OUTPUT_KEY) {
            config.output = output_path(OUTPUT_KEY, v)?;
        }
        if let Some(v) = lookup(HOLIDAYS_KEY) {
            config.holidays_output = output_path(HOLIDAYS_KEY, v)?;
        }
        if let Some(v) = lookup(HOLIDAY_MONTHS_KEY) {
            let months: u32 = v
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid(HOLIDAY_MONTHS_KEY, &v, e.to_string()))?;
            if months == 0 {
                return Err(invalid(HOLIDAY_MONTHS_KEY, &v, "must be at least 1"));
            }
            config.holiday_months = months;
        }
        if let Some(v) = lookup(TIMEOUT_KEY) {
            config.timeout_secs = v
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid(TIMEOUT_KEY, &v, e.to_string()))?;
        }
        if let Some(v) = lookup(LOG_KEY) {
            config.log_level = v;
        }

        Ok(config)
    }
}

fn output_path(key: &'static str, value: String) -> Result<PathBuf, ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        return Err(invalid(key, &value, "output must be a file path"));
    }
    Ok(PathBuf::from(value))
}

fn parse_pages(s: &str) -> Result<Vec<(StationId, String)>, ConfigError> {
    let pages = s
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            // Only the first `=` separates; URLs carry their own.
            let (id, url) = entry
                .split_once('=')
                .ok_or_else(|| invalid(PAGES_KEY, s, format!("expected id=url, got {entry:?}")))?;
            let id = StationId::parse(id.trim()).map_err(|e| invalid(PAGES_KEY, s, e.to_string()))?;
            Ok((id, url.trim().to_string()))
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;

    if pages.is_empty() {
        return Err(invalid(PAGES_KEY, s, "no pages listed"));
    }
    Ok(pages)
}

fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// HTTP scraper for timetable pages.
#[derive(Debug, Clone)]
pub struct TimetableScraper {
    http: reqwest::Client,
}

impl TimetableScraper {
    /// Create a new scraper.
    pub fn new(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { http })
    }

    /// Fetch and parse one station's page.
    pub async fn scrape_station(&self, station: &StationId, url: &str) -> Result<Timetable, ScrapeError> {
        info!(%station, %url, "fetching timetable page");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let mut timetable = Timetable::new();
        for (day_type, departures) in parse_timetable_page(&body)? {
            info!(%station, %day_type, departures = departures.len(), "parsed timetable tab");
            timetable.insert(station.clone(), day_type, departures);
        }
        Ok(timetable)
    }

    /// Scrape every page into one timetable.
    ///
    /// Stations whose page cannot be fetched are left out.
    pub async fn scrape_all(&self, pages: &[(StationId, String)]) -> Timetable {
        let mut timetable = Timetable::new();

        for (station, url) in pages {
            match self.scrape_station(station, url).await {
                Ok(scraped) => timetable.merge(scraped),
                Err(e) => warn!(%station, %url, error = %e, "skipping station"),
            }
        }

        timetable
    }
}

/// Write a document as pretty-printed JSON, creating parent directories.
pub async fn write_json<T: Serialize + ?Sized>(path: &Path, document: &T) -> Result<(), ScrapeError> {
    let io_err = |source| ScrapeError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let json = serde_json::to_string_pretty(document)?;
    tokio::fs::write(path, &json).await.map_err(io_err)?;

    debug!(path = %path.display(), bytes = json.len(), "wrote document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use axum::{Router, http::StatusCode, routing::get};
    use tempfile::tempdir;

    use crate::domain::{DayType, Departure};
    use crate::schedule::HolidayCalendar;

    const PAGE: &str = r#"
        <div id="time_table_tab_1">
            <dl class="sp_tblTime"><dt>7</dt><dd><span>10</span><span>40茅</span></dd></dl>
        </div>
    "#;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_pages_cover_both_stations() {
        let config = ScrapeConfig::from_lookup(lookup(&[])).unwrap();
        let ids: Vec<_> = config.pages.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["chigasaki", "tsujido"]);
        assert!(config.pages[0].1.contains("cs=0000802161-6"));
        assert_eq!(config.output, PathBuf::from("data/bus_timetable.json"));
        assert_eq!(config.holidays_output, PathBuf::from("data/holidays.json"));
        assert_eq!(config.holiday_months, 6);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn holiday_and_log_overrides() {
        let config = ScrapeConfig::from_lookup(lookup(&[
            ("BUS_BOARD_HOLIDAYS", "out/holidays.json"),
            ("BUS_BOARD_HOLIDAY_MONTHS", "12"),
            ("BUS_BOARD_LOG", "bus_board=debug"),
        ]))
        .unwrap();

        assert_eq!(config.holidays_output, PathBuf::from("out/holidays.json"));
        assert_eq!(config.holiday_months, 12);
        assert_eq!(config.log_level, "bus_board=debug");
    }

    #[test]
    fn pages_keep_query_strings() {
        let config = ScrapeConfig::from_lookup(lookup(&[
            ("BUS_BOARD_SCRAPE_PAGES", "fujisawa=https://example.com/t?cs=1&nid=2"),
            ("BUS_BOARD_TIMETABLE", "out/timetable.json"),
        ]))
        .unwrap();

        assert_eq!(config.pages.len(), 1);
        assert_eq!(config.pages[0].0.as_str(), "fujisawa");
        assert_eq!(config.pages[0].1, "https://example.com/t?cs=1&nid=2");
        assert_eq!(config.output, PathBuf::from("out/timetable.json"));
    }

    #[test]
    fn bad_scrape_config_rejected() {
        assert!(ScrapeConfig::from_lookup(lookup(&[("BUS_BOARD_SCRAPE_PAGES", "no-url")])).is_err());
        assert!(ScrapeConfig::from_lookup(lookup(&[("BUS_BOARD_SCRAPE_PAGES", ",")])).is_err());
        assert!(
            ScrapeConfig::from_lookup(lookup(&[("BUS_BOARD_TIMETABLE", "https://example.com/t.json")]))
                .is_err()
        );
        assert!(
            ScrapeConfig::from_lookup(lookup(&[("BUS_BOARD_HOLIDAYS", "http://example.com/h.json")]))
                .is_err()
        );
        assert!(ScrapeConfig::from_lookup(lookup(&[("BUS_BOARD_HOLIDAY_MONTHS", "0")])).is_err());
        assert!(ScrapeConfig::from_lookup(lookup(&[("BUS_BOARD_HOLIDAY_MONTHS", "six")])).is_err());
    }

    #[tokio::test]
    async fn scrape_all_skips_failed_pages() {
        let app = Router::new()
            .route("/ok", get(|| async { PAGE }))
            .route("/gone", get(|| async { StatusCode::NOT_FOUND }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let pages = vec![
            (StationId::parse("chigasaki").unwrap(), format!("http://{addr}/ok")),
            (StationId::parse("tsujido").unwrap(), format!("http://{addr}/gone")),
        ];
        let scraper = TimetableScraper::new(&ScrapeConfig::default()).unwrap();
        let timetable = scraper.scrape_all(&pages).await;

        let chigasaki = StationId::parse("chigasaki").unwrap();
        let weekday = timetable.departures(&chigasaki, DayType::Weekday).unwrap();
        assert_eq!(weekday.len(), 2);
        assert_eq!(weekday[1].note(), Some("茅"));
        assert_eq!(timetable.departures(&chigasaki, DayType::Holiday), Some(&[][..]));

        let tsujido = StationId::parse("tsujido").unwrap();
        assert!(timetable.departures(&tsujido, DayType::Weekday).is_none());
    }

    #[tokio::test]
    async fn written_document_reads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("bus_timetable.json");

        let mut timetable = Timetable::new();
        timetable.insert(
            StationId::parse("chigasaki").unwrap(),
            DayType::Weekday,
            vec![
                Departure::new(6, 5).unwrap(),
                Departure::new(6, 35).unwrap().with_note("茅"),
            ],
        );
        write_json(&path, &timetable).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("茅"));
        assert!(written.contains('\n'));

        let read_back: Timetable = serde_json::from_str(&written).unwrap();
        assert_eq!(read_back, timetable);
    }

    #[tokio::test]
    async fn written_holidays_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("holidays.json");

        let new_year = chrono::NaiveDate::from_ymd_opt(2027, 1, 1).unwrap();
        let calendar: HolidayCalendar = [(new_year, "元日".to_string())].into_iter().collect();
        write_json(&path, &calendar).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"2027-01-01\": \"元日\""));

        let read_back: HolidayCalendar = serde_json::from_str(&written).unwrap();
        assert_eq!(read_back, calendar);
    }
}
