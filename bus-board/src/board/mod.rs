//! Departure board logic.
//!
//! [`classify`] picks the day type for a date, [`select_upcoming`] picks the
//! next departures from a day's list, and [`BoardContext`] ties them to the
//! schedule snapshot and produces the [`BoardSnapshot`] that gets rendered.

mod classify;
mod context;
mod select;
mod view;

pub use classify::classify;
pub use context::{BoardContext, BoardSettings, StationConfig};
pub use select::{Selection, URGENT_THRESHOLD_MINS, Upcoming, is_urgent, select_upcoming};
pub use view::{
    BoardSnapshot, DepartureView, NO_TIME, StationBoard, StationStatus, following_text, format_clock,
    format_date,
};
