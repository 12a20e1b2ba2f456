//! Generators for the documents the server reads.
//!
//! The timetable comes from the operator's mobile timetable pages: one page
//! per station, each page holding a tab per day type. The holiday calendar
//! is computed from the holiday rules.

mod client;
mod error;
mod holidays;
mod page;

pub use client::{DEFAULT_USER_AGENT, ScrapeConfig, TimetableScraper, default_pages, write_json};
pub use error::ScrapeError;
pub use holidays::{CITIZENS_HOLIDAY, SUBSTITUTE_HOLIDAY, holiday_name, japanese_holidays};
pub use page::{parse_minute, parse_timetable_page};
