use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info};

use bus_board::board::BoardContext;
use bus_board::clock::{Clock, SystemClock};
use bus_board::config::BoardConfig;
use bus_board::logging::init_tracing;
use bus_board::schedule::{ScheduleClient, ScheduleStore};
use bus_board::ticker::{TickIntervals, Ticker};
use bus_board::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match BoardConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.log_level);

    let schedule = match ScheduleClient::new(config.client_config()) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to create schedule client");
            return ExitCode::FAILURE;
        }
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = ScheduleStore::new();

    // Board context and ticker
    let context = BoardContext::new(config.stations.clone(), config.settings, clock.now());
    let intervals = TickIntervals {
        clock: config.clock_interval,
        departures: config.departures_interval,
    };
    let (ticker, board_rx) = Ticker::new(context, store.clone(), clock.clone(), intervals);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let ticker_task = tokio::spawn(ticker.run(wait_for_shutdown(shutdown_rx)));

    // Initial load runs in the background; the board shows a loading state
    // until it completes.
    let loader_store = store.clone();
    let loader_client = schedule.clone();
    let loader_clock = clock.clone();
    tokio::spawn(async move {
        // Failures are logged by the store and surface on the board.
        let _ = loader_store
            .load_all(&loader_client, loader_clock.as_ref())
            .await;
    });

    let state = AppState::new(board_rx, store, schedule, clock);
    let static_dir = config.static_dir.to_string_lossy().into_owned();
    let app = create_router(state, &static_dir);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind_addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!(
        addr = %config.bind_addr,
        timetable = %config.timetable_source,
        holidays = %config.holidays_source,
        stations = config.stations.len(),
        "bus board listening on http://{}",
        config.bind_addr
    );

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for shutdown signal");
            }
            info!("shutting down");
            let _ = shutdown_tx.send(true);
        })
        .await;

    if let Err(e) = ticker_task.await {
        error!(error = %e, "ticker task failed");
    }

    match served {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server error");
            ExitCode::FAILURE
        }
    }
}

async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}
