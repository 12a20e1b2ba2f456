//! Day type classification.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::domain::DayType;
use crate::schedule::HolidayCalendar;

/// Decide which schedule applies on `date`.
///
/// A listed holiday wins over the day of the week. Sundays run the holiday
/// schedule, Saturdays the Saturday schedule, and every other day the
/// weekday schedule. An empty calendar only loses the listed holidays.
///
/// # Examples
///
/// ```
/// use bus_board::board::classify;
/// use bus_board::domain::DayType;
/// use bus_board::schedule::HolidayCalendar;
/// use chrono::NaiveDate;
///
/// let calendar = HolidayCalendar::new();
/// let sunday = NaiveDate::from_ymd_opt(2025, 3, 16).unwrap();
/// assert_eq!(classify(sunday, &calendar), DayType::Holiday);
/// ```
pub fn classify(date: NaiveDate, holidays: &HolidayCalendar) -> DayType {
    if holidays.contains(date) {
        return DayType::Holiday;
    }

    match date.weekday() {
        Weekday::Sun => DayType::Holiday,
        Weekday::Sat => DayType::Saturday,
        _ => DayType::Weekday,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekdays_without_holidays() {
        let calendar = HolidayCalendar::new();
        // 2025-03-10 is a Monday
        for day in 10..=14 {
            assert_eq!(classify(date(2025, 3, day), &calendar), DayType::Weekday);
        }
        assert_eq!(classify(date(2025, 3, 15), &calendar), DayType::Saturday);
        assert_eq!(classify(date(2025, 3, 16), &calendar), DayType::Holiday);
    }

    #[test]
    fn listed_holiday_on_tuesday() {
        // 2025-02-11 (建国記念の日) is a Tuesday
        let calendar: HolidayCalendar = [(date(2025, 2, 11), "建国記念の日".to_string())]
            .into_iter()
            .collect();
        assert_eq!(date(2025, 2, 11).weekday(), Weekday::Tue);
        assert_eq!(classify(date(2025, 2, 11), &calendar), DayType::Holiday);
        assert_eq!(classify(date(2025, 2, 12), &calendar), DayType::Weekday);
    }

    #[test]
    fn listed_holiday_on_saturday() {
        // 2024-11-23 (勤労感謝の日) is a Saturday
        let calendar: HolidayCalendar = [(date(2024, 11, 23), "勤労感謝の日".to_string())]
            .into_iter()
            .collect();
        assert_eq!(classify(date(2024, 11, 23), &calendar), DayType::Holiday);
    }
}
