//! Data transfer objects for web responses.

use serde::Serialize;

use crate::board::{BoardSnapshot, DepartureView, StationBoard, StationStatus};
use crate::domain::DayType;

/// The board as JSON.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    /// Current date, e.g. "2025年3月14日 (金)"
    pub date: String,

    /// Current time, "HH:MM"
    pub time: String,

    /// Active day type
    pub day_type: DayType,

    /// Display label for the day type
    pub day_type_label: String,

    /// Holiday name when today is a listed holiday
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holiday_name: Option<String>,

    /// When the timetable was last loaded
    pub last_updated: Option<String>,

    /// One entry per station, in display order
    pub stations: Vec<StationResult>,
}

impl BoardResponse {
    pub fn from_board(board: &BoardSnapshot) -> Self {
        Self {
            date: board.date_text(),
            time: board.clock_text(),
            day_type: board.day_type,
            day_type_label: board.day_type_label().to_string(),
            holiday_name: board.holiday_name.clone(),
            last_updated: board.last_updated_text(),
            stations: board.stations.iter().map(StationResult::from_station).collect(),
        }
    }
}

/// A station panel as JSON.
#[derive(Debug, Serialize)]
pub struct StationResult {
    /// Station identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// One of "loading", "fetch_failed", "no_data", "service_ended", "upcoming"
    pub status: &'static str,

    /// Human-readable status or remaining-time text
    pub message: String,

    /// Upcoming departures, next first
    pub departures: Vec<DepartureResult>,
}

impl StationResult {
    pub fn from_station(station: &StationBoard) -> Self {
        let (status, departures) = match &station.status {
            StationStatus::Loading => ("loading", vec![]),
            StationStatus::FetchFailed => ("fetch_failed", vec![]),
            StationStatus::NoData => ("no_data", vec![]),
            StationStatus::ServiceEnded => ("service_ended", vec![]),
            StationStatus::Upcoming(list) => (
                "upcoming",
                list.iter().map(DepartureResult::from_view).collect(),
            ),
        };

        Self {
            id: station.id.to_string(),
            name: station.name.clone(),
            status,
            message: station.remaining_text(),
            departures,
        }
    }
}

/// A departure as JSON.
#[derive(Debug, Serialize)]
pub struct DepartureResult {
    /// "H:MM"
    pub time: String,

    /// Minutes until departure
    pub minutes_remaining: u16,

    /// Whether the departure is imminent
    pub urgent: bool,

    /// Timetable annotation mark
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl DepartureResult {
    pub fn from_view(view: &DepartureView) -> Self {
        Self {
            time: view.time.clone(),
            minutes_remaining: view.minutes_remaining,
            urgent: view.urgent,
            note: view.note.clone(),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::StationId;

    #[test]
    fn board_response_json() {
        let now = NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(7, 26, 0)
            .unwrap();
        let board = BoardSnapshot {
            now,
            day_type: DayType::Weekday,
            holiday_name: None,
            stations: vec![
                StationBoard {
                    id: StationId::parse("chigasaki").unwrap(),
                    name: "茅ヶ崎駅".into(),
                    status: StationStatus::Upcoming(vec![DepartureView {
                        time: "7:30".into(),
                        minutes_remaining: 4,
                        urgent: true,
                        note: None,
                    }]),
                },
                StationBoard {
                    id: StationId::parse("tsujido").unwrap(),
                    name: "辻堂駅".into(),
                    status: StationStatus::ServiceEnded,
                },
            ],
            last_updated: None,
            schedule_generation: 0,
        };

        let json = serde_json::to_value(BoardResponse::from_board(&board)).unwrap();
        assert_eq!(json["date"], "2025年3月14日 (金)");
        assert_eq!(json["time"], "07:26");
        assert_eq!(json["day_type"], "weekday");
        assert_eq!(json["day_type_label"], "平日ダイヤ");
        assert!(json.get("holiday_name").is_none());
        assert!(json["last_updated"].is_null());

        let chigasaki = &json["stations"][0];
        assert_eq!(chigasaki["status"], "upcoming");
        assert_eq!(chigasaki["message"], "あと4分");
        assert_eq!(chigasaki["departures"][0]["time"], "7:30");
        assert_eq!(chigasaki["departures"][0]["urgent"], true);
        assert!(chigasaki["departures"][0].get("note").is_none());

        let tsujido = &json["stations"][1];
        assert_eq!(tsujido["status"], "service_ended");
        assert_eq!(tsujido["message"], "本日のバスは終了しました");
        assert_eq!(tsujido["departures"].as_array().unwrap().len(), 0);
    }
}
