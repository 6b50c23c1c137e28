use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockcast_core::{ProductId, SnapshotId, TenantId};

use crate::alerts::Alert;
use crate::error::Diagnostic;
use crate::horizon::Horizon;
use crate::reorder::DaysUntilStockout;
use crate::trend::Trend;

/// Forecast and reorder recommendation for one product.
///
/// Recomputed on every run; never persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub product_id: ProductId,
    pub predicted_demand: u64,
    /// Heuristic stability signal in \[65, 95\], not a probability.
    pub confidence: f64,
    pub trend: Trend,
    pub suggested_order_quantity: u64,
    pub days_until_stockout: DaysUntilStockout,
}

/// Dashboard counters for one published report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub products_monitored: usize,
    pub active_alerts: usize,
    /// Mean confidence rounded to a whole percentage; 0 when nothing was forecast.
    pub average_confidence: u32,
    pub suggested_orders: usize,
    pub imminent_stockouts: usize,
}

impl ReportSummary {
    pub fn compute(
        products_monitored: usize,
        predictions: &[PredictionResult],
        alerts: &[Alert],
        stockout_warning_days: u64,
    ) -> Self {
        let average_confidence = if predictions.is_empty() {
            0
        } else {
            let total: f64 = predictions.iter().map(|p| p.confidence).sum();
            (total / predictions.len() as f64).round() as u32
        };

        Self {
            products_monitored,
            active_alerts: alerts.len(),
            average_confidence,
            suggested_orders: predictions
                .iter()
                .filter(|p| p.suggested_order_quantity > 0)
                .count(),
            imminent_stockouts: predictions
                .iter()
                .filter(|p| p.days_until_stockout.is_within(stockout_warning_days))
                .count(),
        }
    }
}

/// Everything the presentation layer renders, derived from a single snapshot.
///
/// `horizon` is `None` when only alerts have been evaluated for this snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub snapshot_id: SnapshotId,
    pub tenant_id: TenantId,
    pub generated_at: DateTime<Utc>,
    pub horizon: Option<Horizon>,
    pub predictions: Vec<PredictionResult>,
    pub alerts: Vec<Alert>,
    pub diagnostics: Vec<Diagnostic>,
    pub summary: ReportSummary,
}
