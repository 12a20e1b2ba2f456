//! Schedule Store: the timetable and holiday calendar documents.
//!
//! Both documents are fetched with one-shot loads (at startup and on manual
//! refresh) and held as an immutable snapshot. A load replaces its document
//! wholesale; readers never see a partially updated timetable.

mod client;
mod error;
mod store;
mod types;

pub use client::{DocumentSource, ScheduleClient, ScheduleClientConfig};
pub use error::ScheduleError;
pub use store::{ScheduleSnapshot, ScheduleStore, TimetableState};
pub use types::{HolidayCalendar, Timetable};
