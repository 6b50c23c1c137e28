use std::path::PathBuf;
use std::time::Duration;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};

use stockcast_forecast::{ForecastPolicy, Horizon};

pub const HORIZON_ENV: &str = "STOCKCAST_HORIZON";
pub const LATENCY_ENV: &str = "STOCKCAST_LATENCY_MS";
pub const FORECAST_ALERTS_ENV: &str = "STOCKCAST_FORECAST_ALERTS";

/// Run one demand analysis cycle over a catalog export and print the report as JSON.
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(name = "stockcast", version)]
pub struct Cli {
    /// Catalog export (tenant id, products and their sales history).
    pub catalog_path: PathBuf,

    /// Forecast horizon: week, month or quarter.
    #[arg(env = HORIZON_ENV, default_value = "month")]
    pub horizon: Horizon,

    /// Delay held while the cycle is analyzing, in milliseconds.
    #[arg(long = "latency-ms", env = LATENCY_ENV, default_value_t = 0)]
    pub latency_ms: u64,

    /// Also raise order-suggestion and high-demand alerts.
    #[arg(
        long,
        env = FORECAST_ALERTS_ENV,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        default_value_t = false
    )]
    pub forecast_alerts: bool,
}

impl Cli {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn policy(&self) -> ForecastPolicy {
        ForecastPolicy::default()
            .with_simulated_latency(self.latency())
            .with_forecast_alerts(self.forecast_alerts)
    }
}
