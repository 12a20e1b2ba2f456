//! Bus departure board server.
//!
//! Shows the next departures from a set of stations, chosen from a weekly
//! timetable by today's day type (weekday, Saturday, or holiday), with the
//! minutes remaining until each bus.

pub mod board;
pub mod clock;
pub mod config;
pub mod domain;
pub mod logging;
pub mod schedule;
pub mod scrape;
pub mod ticker;
pub mod web;
