//! Scrape the operator's timetable pages into the timetable document.

use std::process::ExitCode;

use tracing::{error, info, warn};

use bus_board::logging::init_tracing;
use bus_board::scrape::{ScrapeConfig, TimetableScraper, write_json};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ScrapeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.log_level);

    let scraper = match TimetableScraper::new(&config) {
        Ok(scraper) => scraper,
        Err(e) => {
            error!(error = %e, "failed to create HTTP client");
            return ExitCode::FAILURE;
        }
    };

    let timetable = scraper.scrape_all(&config.pages).await;
    let scraped = timetable.stations().count();
    if scraped < config.pages.len() {
        warn!(scraped, configured = config.pages.len(), "some stations were skipped");
    }

    match write_json(&config.output, &timetable).await {
        Ok(()) => {
            info!(
                output = %config.output.display(),
                stations = scraped,
                departures = timetable.departure_count(),
                "wrote timetable"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "failed to write timetable");
            ExitCode::FAILURE
        }
    }
}
