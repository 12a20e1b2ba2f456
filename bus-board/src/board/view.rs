//! Rendered board state.
//!
//! A [`BoardSnapshot`] is everything one screen refresh needs: the clock,
//! the active day type, and a status per station. Text helpers produce the
//! strings shown in each page region.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::domain::{DayType, StationId};

/// Placeholder shown instead of a departure time.
pub const NO_TIME: &str = "--:--";

const WEEKDAY_NAMES: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

/// One departure as displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartureView {
    /// `H:MM`
    pub time: String,
    pub minutes_remaining: u16,
    pub urgent: bool,
    pub note: Option<String>,
}

/// What a station panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationStatus {
    /// The timetable has not finished loading.
    Loading,
    /// The timetable failed to load.
    FetchFailed,
    /// No departures listed for today's day type.
    NoData,
    /// All of today's departures have left.
    ServiceEnded,
    /// Next departure first, then the following ones.
    Upcoming(Vec<DepartureView>),
}

/// A station panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationBoard {
    pub id: StationId,
    pub name: String,
    pub status: StationStatus,
}

impl StationBoard {
    /// The next departure, if any.
    pub fn next(&self) -> Option<&DepartureView> {
        match &self.status {
            StationStatus::Upcoming(list) => list.first(),
            _ => None,
        }
    }

    /// Departures after the next one.
    pub fn following(&self) -> &[DepartureView] {
        match &self.status {
            StationStatus::Upcoming(list) if list.len() > 1 => &list[1..],
            _ => &[],
        }
    }

    /// Text for the "next departure time" slot.
    pub fn next_time_text(&self) -> &str {
        self.next().map_or(NO_TIME, |d| d.time.as_str())
    }

    /// Text for the "minutes remaining" slot, or the status message.
    pub fn remaining_text(&self) -> String {
        match &self.status {
            StationStatus::Loading => "読み込み中…".to_string(),
            StationStatus::FetchFailed => "データの取得に失敗しました".to_string(),
            StationStatus::NoData => "この時刻表のデータがありません".to_string(),
            StationStatus::ServiceEnded => "本日のバスは終了しました".to_string(),
            StationStatus::Upcoming(list) => list
                .first()
                .map(|d| remaining_text(d.minutes_remaining))
                .unwrap_or_default(),
        }
    }

    /// Whether the next departure is urgent.
    pub fn is_urgent(&self) -> bool {
        self.next().is_some_and(|d| d.urgent)
    }
}

/// Text for a following departure: `次: 8:00 (あと30分)`.
pub fn following_text(departure: &DepartureView) -> String {
    format!(
        "次: {} ({})",
        departure.time,
        remaining_text(departure.minutes_remaining)
    )
}

fn remaining_text(minutes: u16) -> String {
    format!("あと{minutes}分")
}

/// The whole board at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub now: NaiveDateTime,
    pub day_type: DayType,
    /// Name of today's holiday, for the day type tooltip.
    pub holiday_name: Option<String>,
    pub stations: Vec<StationBoard>,
    /// When the timetable was last loaded successfully.
    pub last_updated: Option<NaiveDateTime>,
    /// Schedule generation the departures were computed from.
    pub schedule_generation: u64,
}

impl BoardSnapshot {
    /// Current date: `2025年3月14日 (金)`.
    pub fn date_text(&self) -> String {
        format_date(self.now.date())
    }

    /// Current time: `07:05`.
    pub fn clock_text(&self) -> String {
        format_clock(&self.now)
    }

    pub fn day_type_label(&self) -> &'static str {
        self.day_type.label()
    }

    pub fn last_updated_text(&self) -> Option<String> {
        self.last_updated
            .map(|t| t.format("%Y/%-m/%-d %-H:%M:%S").to_string())
    }
}

/// Format a date the way the board shows it.
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{}年{}月{}日 ({})",
        date.year(),
        date.month(),
        date.day(),
        WEEKDAY_NAMES[date.weekday().num_days_from_sunday() as usize]
    )
}

/// Format a clock time as zero-padded `HH:MM`.
pub fn format_clock(time: &impl Timelike) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}
