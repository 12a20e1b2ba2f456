//! Domain types for the bus departure board.
//!
//! All types enforce their invariants at construction time, so code that
//! receives these types can trust their validity.

mod day_type;
mod station;
mod time;

pub use day_type::DayType;
pub use station::{InvalidStationId, StationId};
pub use time::{Departure, MINUTES_PER_DAY, TimeError, minutes_of_day};
