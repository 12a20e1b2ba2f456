//! In-memory schedule snapshot.

use std::sync::Arc;

use chrono::NaiveDateTime;
use futures::future::join;
use tokio::sync::{Notify, RwLock};
use tracing::{info, warn};

use crate::clock::Clock;

use super::client::ScheduleClient;
use super::error::ScheduleError;
use super::types::{HolidayCalendar, Timetable};

/// Load state of the timetable document.
#[derive(Debug, Clone)]
pub enum TimetableState {
    /// The first load has not finished yet.
    Pending,
    /// The last load succeeded.
    Loaded {
        timetable: Arc<Timetable>,
        loaded_at: NaiveDateTime,
    },
    /// The last load failed; there is no timetable to show.
    Failed { message: String },
}

/// Everything the board reads, as one consistent value.
#[derive(Debug, Clone)]
pub struct ScheduleSnapshot {
    pub timetable: TimetableState,
    pub holidays: Arc<HolidayCalendar>,
    /// Bumped by every replacement of either document.
    pub generation: u64,
}

impl Default for ScheduleSnapshot {
    fn default() -> Self {
        Self {
            timetable: TimetableState::Pending,
            holidays: Arc::new(HolidayCalendar::new()),
            generation: 0,
        }
    }
}

/// Shared schedule store.
///
/// The only writers are the load operations, which replace a whole document
/// at a time. Readers take a cheap clone of the current snapshot.
#[derive(Clone, Default)]
pub struct ScheduleStore {
    inner: Arc<RwLock<ScheduleSnapshot>>,
    changed: Arc<Notify>,
}

impl ScheduleStore {
    /// Create an empty store (timetable pending, no holidays).
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot.
    pub async fn snapshot(&self) -> ScheduleSnapshot {
        self.inner.read().await.clone()
    }

    /// Wait until a load replaces part of the snapshot.
    ///
    /// A replacement that happens while nobody is waiting is remembered, so
    /// the next call returns immediately.
    pub async fn changed(&self) {
        self.changed.notified().await;
    }

    /// Install a timetable.
    pub async fn set_timetable(&self, timetable: Timetable, loaded_at: NaiveDateTime) {
        self.replace_timetable(TimetableState::Loaded {
            timetable: Arc::new(timetable),
            loaded_at,
        })
        .await;
    }

    /// Record a failed timetable load. Any previous timetable is dropped.
    pub async fn set_timetable_failed(&self, message: impl Into<String>) {
        self.replace_timetable(TimetableState::Failed {
            message: message.into(),
        })
        .await;
    }

    /// Install a holiday calendar.
    pub async fn set_holidays(&self, holidays: HolidayCalendar) {
        {
            let mut guard = self.inner.write().await;
            guard.holidays = Arc::new(holidays);
            guard.generation += 1;
        }
        self.changed.notify_one();
    }

    async fn replace_timetable(&self, state: TimetableState) {
        {
            let mut guard = self.inner.write().await;
            guard.timetable = state;
            guard.generation += 1;
        }
        self.changed.notify_one();
    }

    /// Load the timetable from `client`.
    ///
    /// On failure the store is left without a timetable and the error is
    /// returned. No retry is scheduled.
    pub async fn load_timetable(
        &self,
        client: &ScheduleClient,
        clock: &dyn Clock,
    ) -> Result<usize, ScheduleError> {
        match client.fetch_timetable().await {
            Ok(timetable) => {
                let count = timetable.departure_count();
                info!(
                    source = %client.timetable_source(),
                    departures = count,
                    "loaded timetable"
                );
                self.set_timetable(timetable, clock.now()).await;
                Ok(count)
            }
            Err(e) => {
                warn!(source = %client.timetable_source(), error = %e, "failed to load timetable");
                self.set_timetable_failed(e.to_string()).await;
                Err(e)
            }
        }
    }

    /// Load the holiday calendar from `client`.
    ///
    /// Failure degrades to an empty calendar: weekday, Saturday and Sunday
    /// classification keeps working, only listed holidays are missed.
    pub async fn load_holidays(&self, client: &ScheduleClient) -> usize {
        let holidays = match client.fetch_holidays().await {
            Ok(holidays) => {
                info!(
                    source = %client.holidays_source(),
                    holidays = holidays.len(),
                    "loaded holiday calendar"
                );
                holidays
            }
            Err(e) => {
                warn!(
                    source = %client.holidays_source(),
                    error = %e,
                    "failed to load holiday calendar, continuing without holidays"
                );
                HolidayCalendar::new()
            }
        };
        let count = holidays.len();
        self.set_holidays(holidays).await;
        count
    }

    /// Load both documents concurrently and independently.
    pub async fn load_all(
        &self,
        client: &ScheduleClient,
        clock: &dyn Clock,
    ) -> Result<usize, ScheduleError> {
        let (timetable, _) = join(
            self.load_timetable(client, clock),
            self.load_holidays(client),
        )
        .await;
        timetable
    }
}
