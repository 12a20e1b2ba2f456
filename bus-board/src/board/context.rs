//! Board context: the state the render loop carries between ticks.

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::domain::{DayType, StationId, minutes_of_day};
use crate::schedule::{ScheduleSnapshot, TimetableState};

use super::classify::classify;
use super::select::{Selection, URGENT_THRESHOLD_MINS, is_urgent, select_upcoming};
use super::view::{BoardSnapshot, DepartureView, StationBoard, StationStatus};

/// A station shown on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationConfig {
    /// Key in the timetable document
    pub id: StationId,
    /// Display name
    pub name: String,
}

impl StationConfig {
    pub fn new(id: StationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Selection and highlighting parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSettings {
    /// How many departures to show per station ("next" plus "following").
    pub upcoming_count: usize,

    /// Departures at most this many minutes away are urgent.
    pub urgent_threshold_mins: u16,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            upcoming_count: 2,
            urgent_threshold_mins: URGENT_THRESHOLD_MINS,
        }
    }
}

/// Owns the recorded day type and the latest board.
///
/// Each method takes the current time and a schedule snapshot, so the
/// context never reads shared state on its own.
#[derive(Debug, Clone)]
pub struct BoardContext {
    stations: Vec<StationConfig>,
    settings: BoardSettings,
    day_type: Option<DayType>,
    board: BoardSnapshot,
}

impl BoardContext {
    /// Create a context whose board shows every station as loading.
    pub fn new(stations: Vec<StationConfig>, settings: BoardSettings, now: NaiveDateTime) -> Self {
        let board = BoardSnapshot {
            now,
            day_type: DayType::Weekday,
            holiday_name: None,
            stations: stations
                .iter()
                .map(|s| StationBoard {
                    id: s.id.clone(),
                    name: s.name.clone(),
                    status: StationStatus::Loading,
                })
                .collect(),
            last_updated: None,
            schedule_generation: 0,
        };

        Self {
            stations,
            settings,
            day_type: None,
            board,
        }
    }

    /// The day type recorded by the last tick, if any tick has run.
    pub fn day_type(&self) -> Option<DayType> {
        self.day_type
    }

    /// The latest board.
    pub fn board(&self) -> &BoardSnapshot {
        &self.board
    }

    /// Clock tick: update the clock and day type.
    ///
    /// When the day type differs from the recorded one, departures are
    /// recomputed immediately and `true` is returned.
    pub fn tick_clock(&mut self, now: NaiveDateTime, schedule: &ScheduleSnapshot) -> bool {
        let day_type = self.update_clock(now, schedule);

        if self.day_type == Some(day_type) {
            return false;
        }

        info!(from = ?self.day_type, to = %day_type, "day type changed");
        self.day_type = Some(day_type);
        self.fill_departures(now, day_type, schedule);
        true
    }

    /// Departure tick: recompute every station's departures.
    pub fn refresh_departures(&mut self, now: NaiveDateTime, schedule: &ScheduleSnapshot) {
        let day_type = self.update_clock(now, schedule);
        self.day_type = Some(day_type);
        self.fill_departures(now, day_type, schedule);
    }

    fn update_clock(&mut self, now: NaiveDateTime, schedule: &ScheduleSnapshot) -> DayType {
        let date = now.date();
        let day_type = classify(date, &schedule.holidays);

        self.board.now = now;
        self.board.day_type = day_type;
        self.board.holiday_name = schedule.holidays.name_for(date).map(str::to_string);
        day_type
    }

    fn fill_departures(&mut self, now: NaiveDateTime, day_type: DayType, schedule: &ScheduleSnapshot) {
        let now_minutes = minutes_of_day(&now);
        self.board.schedule_generation = schedule.generation;

        self.board.last_updated = match &schedule.timetable {
            TimetableState::Loaded { loaded_at, .. } => Some(*loaded_at),
            _ => None,
        };

        let stations = self
            .stations
            .iter()
            .map(|station| StationBoard {
                id: station.id.clone(),
                name: station.name.clone(),
                status: self.station_status(&station.id, day_type, now_minutes, schedule),
            })
            .collect();
        self.board.stations = stations;

        debug!(
            %day_type,
            now_minutes,
            stations = self.board.stations.len(),
            "recomputed departures"
        );
    }

    fn station_status(
        &self,
        station: &StationId,
        day_type: DayType,
        now_minutes: u16,
        schedule: &ScheduleSnapshot,
    ) -> StationStatus {
        let timetable = match &schedule.timetable {
            TimetableState::Pending => return StationStatus::Loading,
            TimetableState::Failed { .. } => return StationStatus::FetchFailed,
            TimetableState::Loaded { timetable, .. } => timetable,
        };

        let departures = timetable.departures(station, day_type);
        match select_upcoming(departures, now_minutes, self.settings.upcoming_count) {
            Selection::NoData => StationStatus::NoData,
            Selection::ServiceEnded => StationStatus::ServiceEnded,
            Selection::Upcoming(list) => StationStatus::Upcoming(
                list.into_iter()
                    .map(|u| DepartureView {
                        time: u.departure.to_string(),
                        minutes_remaining: u.minutes_remaining,
                        urgent: is_urgent(u.minutes_remaining, self.settings.urgent_threshold_mins),
                        note: u.departure.note().map(str::to_string),
                    })
                    .collect(),
            ),
        }
    }
}
