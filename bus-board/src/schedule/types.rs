//! Timetable and holiday calendar documents.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{DayType, Departure, StationId};

use super::error::ScheduleError;

/// Weekly bus timetable: station -> day type -> departures.
///
/// Serialized exactly as the timetable document:
///
/// ```json
/// { "chigasaki": { "weekday": [ { "hour": 7, "minute": 0 } ] } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timetable {
    stations: BTreeMap<StationId, BTreeMap<DayType, Vec<Departure>>>,
}

impl Timetable {
    /// Create an empty timetable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the departure list for one station and day type.
    pub fn insert(&mut self, station: StationId, day_type: DayType, departures: Vec<Departure>) {
        self.stations
            .entry(station)
            .or_default()
            .insert(day_type, departures);
    }

    /// Add every list from `other`, replacing lists already present.
    pub fn merge(&mut self, other: Timetable) {
        for (station, by_day) in other.stations {
            self.stations.entry(station).or_default().extend(by_day);
        }
    }

    /// Departures for a station on a day type.
    ///
    /// Returns `None` if the station is not in the timetable. A station
    /// without a list for `day_type` yields an empty slice.
    pub fn departures(&self, station: &StationId, day_type: DayType) -> Option<&[Departure]> {
        let by_day = self.stations.get(station)?;
        Some(by_day.get(&day_type).map(Vec::as_slice).unwrap_or(&[]))
    }

    /// Station identifiers present in the timetable.
    pub fn stations(&self) -> impl Iterator<Item = &StationId> {
        self.stations.keys()
    }

    /// Total number of departures across all stations and day types.
    pub fn departure_count(&self) -> usize {
        self.stations
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    /// Check that every departure list is in chronological order.
    ///
    /// The selector relies on list order; an out-of-order list would make it
    /// silently skip earlier buses.
    pub fn check_sorted(&self) -> Result<(), ScheduleError> {
        for (station, by_day) in &self.stations {
            for (day_type, departures) in by_day {
                let unsorted = departures
                    .windows(2)
                    .position(|w| w[1].minutes_of_day() < w[0].minutes_of_day());
                if let Some(pos) = unsorted {
                    return Err(ScheduleError::Unsorted {
                        station: station.clone(),
                        day_type: *day_type,
                        index: pos + 1,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Calendar of public holidays: date -> holiday name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolidayCalendar {
    days: BTreeMap<NaiveDate, String>,
}

impl HolidayCalendar {
    /// Create an empty calendar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the holiday on `date`, if it is one.
    pub fn name_for(&self, date: NaiveDate) -> Option<&str> {
        self.days.get(&date).map(String::as_str)
    }

    /// Whether `date` is a listed holiday.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl FromIterator<(NaiveDate, String)> for HolidayCalendar {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, String)>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(s: &str) -> StationId {
        StationId::parse(s).unwrap()
    }

    fn dep(h: u32, m: u32) -> Departure {
        Departure::new(h, m).unwrap()
    }

    #[test]
    fn merge_replaces_per_day_type() {
        let mut base = Timetable::new();
        base.insert(station("chigasaki"), DayType::Weekday, vec![dep(6, 0)]);
        base.insert(station("chigasaki"), DayType::Saturday, vec![dep(7, 0)]);

        let mut other = Timetable::new();
        other.insert(station("chigasaki"), DayType::Weekday, vec![dep(6, 30)]);
        other.insert(station("tsujido"), DayType::Weekday, vec![dep(8, 0)]);
        base.merge(other);

        assert_eq!(
            base.departures(&station("chigasaki"), DayType::Weekday),
            Some(&[dep(6, 30)][..])
        );
        assert_eq!(
            base.departures(&station("chigasaki"), DayType::Saturday),
            Some(&[dep(7, 0)][..])
        );
        assert_eq!(base.stations().count(), 2);
    }

    #[test]
    fn parse_timetable_document() {
        let json = r#"{
            "chigasaki": {
                "weekday": [{"hour": "6", "minute": "05"}, {"hour": 6, "minute": 40, "note": "a"}],
                "saturday": [],
                "holiday": [{"hour": 7, "minute": 10}]
            },
            "tsujido": {
                "weekday": [{"hour": 6, "minute": 15}]
            }
        }"#;

        let timetable: Timetable = serde_json::from_str(json).unwrap();
        assert_eq!(timetable.departure_count(), 4);

        let weekday = timetable
            .departures(&station("chigasaki"), DayType::Weekday)
            .unwrap();
        assert_eq!(weekday.len(), 2);
        assert_eq!(weekday[0], dep(6, 5));
        assert_eq!(weekday[1].note(), Some("a"));

        assert_eq!(
            timetable.departures(&station("chigasaki"), DayType::Saturday),
            Some(&[][..])
        );
        // Missing day type behaves like an empty list
        assert_eq!(
            timetable.departures(&station("tsujido"), DayType::Holiday),
            Some(&[][..])
        );
        // Unknown station
        assert_eq!(timetable.departures(&station("fujisawa"), DayType::Weekday), None);

        let ids: Vec<_> = timetable.stations().map(StationId::as_str).collect();
        assert_eq!(ids, vec!["chigasaki", "tsujido"]);
    }

    #[test]
    fn reject_unknown_day_type() {
        let json = r#"{"chigasaki": {"sunday": []}}"#;
        assert!(serde_json::from_str::<Timetable>(json).is_err());
    }

    #[test]
    fn reject_invalid_station_key() {
        let json = r#"{"Chigasaki Station": {"weekday": []}}"#;
        assert!(serde_json::from_str::<Timetable>(json).is_err());
    }

    #[test]
    fn check_sorted_accepts_ordered_lists() {
        let mut timetable = Timetable::new();
        timetable.insert(
            station("chigasaki"),
            DayType::Weekday,
            vec![dep(6, 0), dep(6, 0), dep(6, 30), dep(7, 5)],
        );
        timetable.insert(station("tsujido"), DayType::Holiday, vec![]);
        assert!(timetable.check_sorted().is_ok());
    }

    #[test]
    fn check_sorted_reports_first_violation() {
        let mut timetable = Timetable::new();
        timetable.insert(
            station("tsujido"),
            DayType::Saturday,
            vec![dep(6, 0), dep(7, 0), dep(6, 45)],
        );

        match timetable.check_sorted() {
            Err(ScheduleError::Unsorted {
                station: s,
                day_type,
                index,
            }) => {
                assert_eq!(s.as_str(), "tsujido");
                assert_eq!(day_type, DayType::Saturday);
                assert_eq!(index, 2);
            }
            other => panic!("expected Unsorted, got {other:?}"),
        }
    }

    #[test]
    fn parse_holiday_document() {
        let json = r#"{"2025-01-01": "元日", "2025-01-13": "成人の日"}"#;
        let calendar: HolidayCalendar = serde_json::from_str(json).unwrap();

        assert_eq!(calendar.len(), 2);
        let new_year = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(calendar.name_for(new_year), Some("元日"));
        assert!(calendar.contains(new_year));

        let ordinary = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(calendar.name_for(ordinary), None);
        assert!(!calendar.contains(ordinary));
    }

    #[test]
    fn reject_malformed_holiday_date() {
        let json = r#"{"2025/01/01": "元日"}"#;
        assert!(serde_json::from_str::<HolidayCalendar>(json).is_err());
    }
}
