//! Askama templates for the web frontend.

use askama::Template;

use crate::board::{BoardSnapshot, StationBoard, StationStatus, following_text};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// The board page.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub board: BoardView,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
}

// ============================================================================
// Fragment Templates (polling responses, no base.html)
// ============================================================================

/// Board fragment, swapped into the page by the polling script.
#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardTemplate {
    pub board: BoardView,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Board view model for templates.
#[derive(Debug, Clone)]
pub struct BoardView {
    pub date: String,
    pub time: String,
    pub day_type_label: String,
    pub holiday_name: Option<String>,
    pub last_updated: Option<String>,
    pub stations: Vec<StationView>,
}

impl BoardView {
    pub fn from_board(board: &BoardSnapshot) -> Self {
        Self {
            date: board.date_text(),
            time: board.clock_text(),
            day_type_label: board.day_type_label().to_string(),
            holiday_name: board.holiday_name.clone(),
            last_updated: board.last_updated_text(),
            stations: board.stations.iter().map(StationView::from_station).collect(),
        }
    }
}

/// Station panel view model for templates.
#[derive(Debug, Clone)]
pub struct StationView {
    pub id: String,
    pub name: String,
    pub next_time: String,
    pub remaining: String,
    pub note: Option<String>,
    pub following: Vec<String>,
    pub urgent: bool,
    /// Extra CSS class for the remaining-time slot.
    pub state_class: &'static str,
}

impl StationView {
    pub fn from_station(station: &StationBoard) -> Self {
        let state_class = match station.status {
            StationStatus::Loading => "loading",
            StationStatus::FetchFailed => "error",
            StationStatus::NoData | StationStatus::ServiceEnded => "ended",
            StationStatus::Upcoming(_) => "upcoming",
        };

        Self {
            id: station.id.to_string(),
            name: station.name.clone(),
            next_time: station.next_time_text().to_string(),
            remaining: station.remaining_text(),
            note: station.next().and_then(|d| d.note.clone()),
            following: station.following().iter().map(following_text).collect(),
            urgent: station.is_urgent(),
            state_class,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::board::DepartureView;
    use crate::domain::{DayType, StationId};

    fn board(status: StationStatus) -> BoardSnapshot {
        BoardSnapshot {
            now: NaiveDate::from_ymd_opt(2025, 3, 14)
                .unwrap()
                .and_hms_opt(7, 26, 0)
                .unwrap(),
            day_type: DayType::Weekday,
            holiday_name: None,
            stations: vec![StationBoard {
                id: StationId::parse("chigasaki").unwrap(),
                name: "茅ヶ崎駅".into(),
                status,
            }],
            last_updated: None,
            schedule_generation: 0,
        }
    }

    fn departure(time: &str, minutes: u16, urgent: bool) -> DepartureView {
        DepartureView {
            time: time.into(),
            minutes_remaining: minutes,
            urgent,
            note: None,
        }
    }

    #[test]
    fn station_view_upcoming() {
        let snapshot = board(StationStatus::Upcoming(vec![
            departure("7:30", 4, true),
            departure("7:45", 19, false),
        ]));
        let view = StationView::from_station(&snapshot.stations[0]);

        assert_eq!(view.next_time, "7:30");
        assert_eq!(view.remaining, "あと4分");
        assert_eq!(view.following, vec!["次: 7:45 (あと19分)".to_string()]);
        assert!(view.urgent);
        assert_eq!(view.state_class, "upcoming");
    }

    #[test]
    fn station_view_service_ended() {
        let snapshot = board(StationStatus::ServiceEnded);
        let view = StationView::from_station(&snapshot.stations[0]);

        assert_eq!(view.next_time, "--:--");
        assert_eq!(view.remaining, "本日のバスは終了しました");
        assert!(view.following.is_empty());
        assert!(!view.urgent);
        assert_eq!(view.state_class, "ended");
    }

    #[test]
    fn board_fragment_renders() {
        let snapshot = board(StationStatus::Upcoming(vec![departure("7:30", 4, true)]));
        let html = BoardTemplate {
            board: BoardView::from_board(&snapshot),
        }
        .render()
        .unwrap();

        assert!(html.contains("茅ヶ崎駅"));
        assert!(html.contains("7:30"));
        assert!(html.contains("あと4分"));
        assert!(html.contains("urgent"));
        assert!(html.contains("平日ダイヤ"));
        assert!(!html.contains("<html"));
    }

    #[test]
    fn index_page_wraps_board() {
        let snapshot = board(StationStatus::Loading);
        let html = IndexTemplate {
            board: BoardView::from_board(&snapshot),
        }
        .render()
        .unwrap();

        assert!(html.contains("<html"));
        assert!(html.contains("読み込み中…"));
        assert!(html.contains("/static/board.js"));
    }
}
