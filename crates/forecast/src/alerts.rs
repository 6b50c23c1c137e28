//! Inventory alerts.
//!
//! Alerts are transient: they are regenerated wholesale on every run, never
//! updated in place and never merged with a previous run's alerts. Kinds are
//! independent; one product can raise several in the same run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockcast_core::ProductId;
use stockcast_products::{Product, SalesObservation};

use crate::policy::AlertThresholds;
use crate::report::PredictionResult;
use crate::trend::{self, Trend};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    LowStock,
    StockoutRisk,
    HighDemand,
    OrderSuggestion,
}

impl AlertKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertKind::LowStock => "low_stock",
            AlertKind::StockoutRisk => "stockout_risk",
            AlertKind::HighDemand => "high_demand",
            AlertKind::OrderSuggestion => "order_suggestion",
        }
    }

    /// Raised from a prediction rather than from inventory state.
    pub fn is_forecast_derived(self) -> bool {
        matches!(self, AlertKind::HighDemand | AlertKind::OrderSuggestion)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// `"<kind>_<product_id>"`, unique within one run.
    pub id: String,
    pub kind: AlertKind,
    pub product_id: ProductId,
    pub product_name: String,
    pub severity: Severity,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Alert {
    fn new(
        kind: AlertKind,
        product: &Product,
        severity: Severity,
        message: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: format!("{}_{}", kind.as_str(), product.id),
            kind,
            product_id: product.id,
            product_name: product.name.clone(),
            severity,
            message,
            created_at,
        }
    }
}

/// Evaluate `low_stock` and `stockout_risk` for one product against its current state.
pub fn evaluate(
    product: &Product,
    history: &[SalesObservation],
    thresholds: &AlertThresholds,
    created_at: DateTime<Utc>,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if product.at_or_below_reorder_point() {
        let critical = (product.current_stock as f64)
            < (product.min_stock as f64) * thresholds.critical_stock_ratio;
        alerts.push(Alert::new(
            AlertKind::LowStock,
            product,
            if critical { Severity::High } else { Severity::Medium },
            format!("Critical stock: only {} units left", product.current_stock),
            created_at,
        ));
    }

    if let Some(days_left) = days_left_at_recent_velocity(product, history, thresholds) {
        if days_left <= thresholds.stockout_risk_days {
            let severity = if days_left <= thresholds.stockout_critical_days {
                Severity::High
            } else {
                Severity::Medium
            };
            alerts.push(Alert::new(
                AlertKind::StockoutRisk,
                product,
                severity,
                format!("Stockout risk in {} days", days_left.floor() as u64),
                created_at,
            ));
        }
    }

    alerts
}

/// `current_stock / (sum of last N observations / N)`; `None` when nothing sold recently.
///
/// The divisor is the configured window length even when fewer observations
/// exist, so short histories read as slower velocity rather than faster.
fn days_left_at_recent_velocity(
    product: &Product,
    history: &[SalesObservation],
    thresholds: &AlertThresholds,
) -> Option<f64> {
    let window = thresholds.velocity_window.max(1);
    let recent = &history[history.len().saturating_sub(window)..];
    let total = trend::total_quantity(recent);
    if total == 0 {
        return None;
    }
    let recent_avg = total as f64 / window as f64;
    Some(product.current_stock.max(0) as f64 / recent_avg)
}

/// Alerts derived from a prediction rather than from inventory state.
pub fn forecast_alerts(
    product: &Product,
    prediction: &PredictionResult,
    created_at: DateTime<Utc>,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    let max_stock = u64::try_from(product.max_stock).unwrap_or(0);
    if prediction.trend == Trend::Up && prediction.predicted_demand > max_stock {
        alerts.push(Alert::new(
            AlertKind::HighDemand,
            product,
            Severity::Medium,
            format!(
                "Projected demand of {} units exceeds maximum stock of {}",
                prediction.predicted_demand, product.max_stock
            ),
            created_at,
        ));
    }

    if prediction.suggested_order_quantity > 0 {
        alerts.push(Alert::new(
            AlertKind::OrderSuggestion,
            product,
            Severity::Low,
            format!(
                "Suggested purchase order: {} units",
                prediction.suggested_order_quantity
            ),
            created_at,
        ));
    }

    alerts
}
