//! The render loop.
//!
//! Two independent periodic timers drive the board: a fast clock tick that
//! re-evaluates the day type, and a slower departures tick. A day type change
//! or a completed schedule load recomputes departures immediately. Every
//! event publishes a fresh [`BoardSnapshot`] on a watch channel.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, trace};

use crate::board::{BoardContext, BoardSnapshot};
use crate::clock::Clock;
use crate::schedule::ScheduleStore;

/// Tick periods.
#[derive(Debug, Clone, Copy)]
pub struct TickIntervals {
    pub clock: Duration,
    pub departures: Duration,
}

impl Default for TickIntervals {
    fn default() -> Self {
        Self {
            clock: Duration::from_secs(1),
            departures: Duration::from_secs(30),
        }
    }
}

/// Scheduler loop that owns the [`BoardContext`].
pub struct Ticker {
    context: BoardContext,
    store: ScheduleStore,
    clock: Arc<dyn Clock>,
    intervals: TickIntervals,
    board_tx: watch::Sender<BoardSnapshot>,
}

impl Ticker {
    /// Create a ticker and the receiver its boards are published on.
    pub fn new(
        context: BoardContext,
        store: ScheduleStore,
        clock: Arc<dyn Clock>,
        intervals: TickIntervals,
    ) -> (Self, watch::Receiver<BoardSnapshot>) {
        let (board_tx, board_rx) = watch::channel(context.board().clone());
        let ticker = Self {
            context,
            store,
            clock,
            intervals,
            board_tx,
        };
        (ticker, board_rx)
    }

    /// Run until `shutdown` resolves.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) {
        let mut clock_tick = interval(self.intervals.clock);
        clock_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut departures_tick = interval(self.intervals.departures);
        departures_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tokio::pin!(shutdown);

        info!(
            clock_secs = self.intervals.clock.as_secs_f64(),
            departures_secs = self.intervals.departures.as_secs_f64(),
            "board ticker started"
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("board ticker stopped");
                    return;
                }
                _ = clock_tick.tick() => {
                    let schedule = self.store.snapshot().await;
                    let now = self.clock.now();
                    if self.context.tick_clock(now, &schedule) {
                        debug!("departures recomputed after day type change");
                    } else {
                        trace!(%now, "clock tick");
                    }
                }
                _ = departures_tick.tick() => {
                    let schedule = self.store.snapshot().await;
                    self.context.refresh_departures(self.clock.now(), &schedule);
                }
                _ = self.store.changed() => {
                    debug!("schedule replaced, recomputing departures");
                    let schedule = self.store.snapshot().await;
                    self.context.refresh_departures(self.clock.now(), &schedule);
                }
            }

            self.board_tx.send_replace(self.context.board().clone());
        }
    }
}
