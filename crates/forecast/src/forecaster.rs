//! Demand forecast for a single product over a horizon.
//!
//! Model (deterministic arithmetic, no training):
//! - Average daily demand over the trend window.
//! - Scale to the horizon, then adjust for trend and for the season of the run date.
//! - Confidence is a heuristic *stability signal* in \[65, 95\]: the more the two
//!   half-window means diverge relative to the average, the lower it gets. It is
//!   not a calibrated probability.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockcast_products::SalesObservation;

use crate::horizon::Horizon;
use crate::seasonality;
use crate::trend::{self, TrendStats};

pub const MIN_CONFIDENCE: f64 = 65.0;
pub const MAX_CONFIDENCE: f64 = 95.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandForecast {
    pub avg_daily_demand: f64,
    pub seasonal_multiplier: f64,
    pub trend: TrendStats,
    pub predicted_demand: u64,
    pub confidence: f64,
}

/// Forecast demand for `horizon` from `history` (ordered oldest-to-newest).
///
/// Only the most recent [`trend::TREND_WINDOW`] observations are considered.
pub fn forecast(history: &[SalesObservation], horizon: Horizon, as_of: NaiveDate) -> DemandForecast {
    let window = trend::trend_window(history);
    let avg_daily_demand = trend::mean_quantity(window);
    let stats = trend::analyze(window);
    let seasonal_multiplier = seasonality::multiplier(as_of);

    let raw = avg_daily_demand
        * f64::from(horizon.days())
        * stats.trend.adjustment()
        * seasonal_multiplier;

    DemandForecast {
        avg_daily_demand,
        seasonal_multiplier,
        trend: stats,
        predicted_demand: raw.round().max(0.0) as u64,
        confidence: confidence(&stats, avg_daily_demand),
    }
}

/// `clamp(65, 95, 100 - (|first - second| / avg) * 10)`; zero velocity pins the floor.
pub fn confidence(stats: &TrendStats, avg_daily_demand: f64) -> f64 {
    if avg_daily_demand <= 0.0 {
        return MIN_CONFIDENCE;
    }
    let raw = 100.0 - (stats.spread() / avg_daily_demand) * 10.0;
    raw.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}
