//! Next-departure selection.

use crate::domain::Departure;

/// Departures this close (in minutes) are flagged as urgent.
pub const URGENT_THRESHOLD_MINS: u16 = 5;

/// A departure that has not left yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upcoming {
    pub departure: Departure,
    /// Minutes from now until departure; always at least 1.
    pub minutes_remaining: u16,
}

/// Result of selecting upcoming departures for one station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// There is no departure list for this station and day type.
    NoData,
    /// The list exists but every departure is at or before the current minute.
    ServiceEnded,
    /// Upcoming departures in timetable order.
    Upcoming(Vec<Upcoming>),
}

impl Selection {
    /// The selected departures (empty unless [`Selection::Upcoming`]).
    pub fn upcoming(&self) -> &[Upcoming] {
        match self {
            Selection::Upcoming(list) => list,
            _ => &[],
        }
    }
}

/// Pick the next `count` departures strictly after `now_minutes`.
///
/// `departures` must already be in chronological order; the list is walked
/// in order and never sorted here. A departure at exactly the current minute
/// counts as gone. There is no rollover into the next day's schedule.
///
/// # Examples
///
/// ```
/// use bus_board::board::{Selection, select_upcoming};
/// use bus_board::domain::Departure;
///
/// let list = vec![
///     Departure::new(7, 0).unwrap(),
///     Departure::new(7, 30).unwrap(),
///     Departure::new(8, 0).unwrap(),
/// ];
/// let selection = select_upcoming(Some(list.as_slice()), 7 * 60 + 30, 2);
/// let upcoming = selection.upcoming();
/// assert_eq!(upcoming.len(), 1);
/// assert_eq!(upcoming[0].departure.to_string(), "8:00");
/// assert_eq!(upcoming[0].minutes_remaining, 30);
///
/// assert_eq!(select_upcoming(Some(&[][..]), 0, 2), Selection::NoData);
/// ```
pub fn select_upcoming(departures: Option<&[Departure]>, now_minutes: u16, count: usize) -> Selection {
    let departures = match departures {
        Some(list) if !list.is_empty() => list,
        _ => return Selection::NoData,
    };

    let mut remaining = departures
        .iter()
        .filter(|d| d.minutes_of_day() > now_minutes)
        .peekable();

    if remaining.peek().is_none() {
        return Selection::ServiceEnded;
    }

    Selection::Upcoming(
        remaining
            .take(count)
            .map(|d| Upcoming {
                departure: d.clone(),
                minutes_remaining: d.minutes_of_day() - now_minutes,
            })
            .collect(),
    )
}

/// Whether a departure this many minutes away should be highlighted.
pub fn is_urgent(minutes_remaining: u16, threshold_mins: u16) -> bool {
    minutes_remaining <= threshold_mins
}
