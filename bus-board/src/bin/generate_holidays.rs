//! Write the holiday calendar for today through the configured months ahead.

use std::process::ExitCode;

use chrono::Months;
use tracing::{error, info};

use bus_board::clock::{Clock, SystemClock};
use bus_board::logging::init_tracing;
use bus_board::scrape::{ScrapeConfig, japanese_holidays, write_json};

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

    let today = SystemClock.now().date();
    let Some(until) = today.checked_add_months(Months::new(config.holiday_months)) else {
        error!(%today, months = config.holiday_months, "holiday window out of range");
        return ExitCode::FAILURE;
    };

    let calendar = japanese_holidays(today, until);
    info!(from = %today, %until, holidays = calendar.len(), "computed holidays");

    match write_json(&config.holidays_output, &calendar).await {
        Ok(()) => {
            info!(output = %config.holidays_output.display(), "wrote holiday calendar");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "failed to write holiday calendar");
            ExitCode::FAILURE
        }
    }
}
