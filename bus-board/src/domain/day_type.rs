//! Timetable day types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which of the three weekly schedules applies on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Weekday,
    Saturday,
    Holiday,
}

impl DayType {
    /// All day types, in timetable tab order.
    pub const ALL: [DayType; 3] = [DayType::Weekday, DayType::Saturday, DayType::Holiday];

    /// The key used in timetable documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::Weekday => "weekday",
            DayType::Saturday => "saturday",
            DayType::Holiday => "holiday",
        }
    }

    /// Label shown on the board.
    pub fn label(&self) -> &'static str {
        match self {
            DayType::Weekday => "平日ダイヤ",
            DayType::Saturday => "土曜ダイヤ",
            DayType::Holiday => "休日ダイヤ",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_document_keys() {
        for day_type in DayType::ALL {
            let json = serde_json::to_string(&day_type).unwrap();
            assert_eq!(json, format!("\"{}\"", day_type.as_str()));
            let back: DayType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, day_type);
        }
        assert!(serde_json::from_str::<DayType>(r#""sunday""#).is_err());
    }

    #[test]
    fn labels() {
        assert_eq!(DayType::Weekday.label(), "平日ダイヤ");
        assert_eq!(DayType::Saturday.label(), "土曜ダイヤ");
        assert_eq!(DayType::Holiday.label(), "休日ダイヤ");
    }
}
