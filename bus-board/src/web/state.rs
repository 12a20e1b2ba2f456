//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::watch;

use crate::board::BoardSnapshot;
use crate::clock::Clock;
use crate::schedule::{ScheduleClient, ScheduleStore};

/// Shared application state.
///
/// Handlers read the board the ticker last published; the store and client
/// are only used for manual refresh.
#[derive(Clone)]
pub struct AppState {
    /// Latest board from the ticker
    pub board: watch::Receiver<BoardSnapshot>,

    /// Schedule snapshot shared with the ticker
    pub store: ScheduleStore,

    /// Document client for reloads
    pub schedule: Arc<ScheduleClient>,

    /// Clock used to stamp reloads
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        board: watch::Receiver<BoardSnapshot>,
        store: ScheduleStore,
        schedule: ScheduleClient,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            board,
            store,
            schedule: Arc::new(schedule),
            clock,
        }
    }

    /// The board as last published.
    pub fn current_board(&self) -> BoardSnapshot {
        self.board.borrow().clone()
    }
}
