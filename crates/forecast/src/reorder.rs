//! Reorder quantity and stockout estimate.

use serde::{Deserialize, Serialize};

use stockcast_products::Product;

use crate::forecaster::DemandForecast;

/// Wire value standing in for "no foreseeable stockout".
pub const NO_STOCKOUT_SENTINEL: u64 = 999;

/// Estimated days until stock runs out at the current average velocity.
///
/// Serialized as a plain integer; [`DaysUntilStockout::Never`] is written as
/// [`NO_STOCKOUT_SENTINEL`] and must not be rendered as a day count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u64", from = "u64")]
pub enum DaysUntilStockout {
    Days(u64),
    Never,
}

impl DaysUntilStockout {
    pub fn days(self) -> Option<u64> {
        match self {
            DaysUntilStockout::Days(d) => Some(d),
            DaysUntilStockout::Never => None,
        }
    }

    /// True when a stockout is forecast strictly within `threshold` days.
    pub fn is_within(self, threshold: u64) -> bool {
        matches!(self, DaysUntilStockout::Days(d) if d < threshold)
    }
}

impl From<DaysUntilStockout> for u64 {
    fn from(value: DaysUntilStockout) -> Self {
        match value {
            DaysUntilStockout::Days(d) => d,
            DaysUntilStockout::Never => NO_STOCKOUT_SENTINEL,
        }
    }
}

impl From<u64> for DaysUntilStockout {
    fn from(value: u64) -> Self {
        if value == NO_STOCKOUT_SENTINEL {
            DaysUntilStockout::Never
        } else {
            DaysUntilStockout::Days(value)
        }
    }
}

impl core::fmt::Display for DaysUntilStockout {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DaysUntilStockout::Days(1) => f.write_str("1 day"),
            DaysUntilStockout::Days(d) => write!(f, "{d} days"),
            DaysUntilStockout::Never => f.write_str("no foreseeable stockout"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderPlan {
    pub suggested_order_quantity: u64,
    pub days_until_stockout: DaysUntilStockout,
}

/// Order enough to cover forecast demand and restore the safety floor, never negative.
///
/// `product` is expected to have passed [`Product::validate`].
pub fn plan(product: &Product, forecast: &DemandForecast) -> ReorderPlan {
    let predicted = i64::try_from(forecast.predicted_demand).unwrap_or(i64::MAX);
    let shortfall = predicted
        .saturating_add(product.min_stock)
        .saturating_sub(product.current_stock);

    let days_until_stockout = if forecast.avg_daily_demand > 0.0 {
        let days = (product.current_stock.max(0) as f64 / forecast.avg_daily_demand).floor();
        DaysUntilStockout::Days(days as u64)
    } else {
        DaysUntilStockout::Never
    };

    ReorderPlan {
        suggested_order_quantity: shortfall.max(0) as u64,
        days_until_stockout,
    }
}
