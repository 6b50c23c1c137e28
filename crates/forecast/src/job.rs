use chrono::{DateTime, Utc};
use tracing::debug;

use stockcast_core::TenantId;

use crate::alerts::{self, Alert};
use crate::error::ForecastError;
use crate::forecaster;
use crate::horizon::AnalysisRequest;
use crate::policy::AlertThresholds;
use crate::reorder;
use crate::report::PredictionResult;
use crate::snapshot::ProductSnapshot;

/// A tenant-scoped unit of analysis over the valid products of one snapshot.
///
/// Jobs are pure: they read their input and return derived output.
/// Publishing results is the orchestrator's concern.
pub trait AnalysisJob: Send + Sync {
    type Output;

    /// Stable name used in logs.
    const NAME: &'static str;

    /// The tenant whose data this job reads.
    fn tenant_id(&self) -> TenantId;

    /// Execute the analysis. Must not mutate its input.
    fn run(&self) -> Result<Self::Output, ForecastError>;
}

/// Forecast + reorder plan for every product, in input order.
#[derive(Debug, Clone, Copy)]
pub struct DemandForecastJob<'a> {
    tenant_id: TenantId,
    products: &'a [&'a ProductSnapshot],
    request: AnalysisRequest,
}

impl<'a> DemandForecastJob<'a> {
    pub fn new(
        tenant_id: TenantId,
        products: &'a [&'a ProductSnapshot],
        request: AnalysisRequest,
    ) -> Self {
        Self {
            tenant_id,
            products,
            request,
        }
    }
}

impl AnalysisJob for DemandForecastJob<'_> {
    type Output = Vec<PredictionResult>;

    const NAME: &'static str = "demand_forecast";

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    fn run(&self) -> Result<Vec<PredictionResult>, ForecastError> {
        Ok(self
            .products
            .iter()
            .map(|entry| predict(entry, &self.request))
            .collect())
    }
}

/// Forecast one product: trend, demand forecast, then reorder plan.
pub fn predict(entry: &ProductSnapshot, request: &AnalysisRequest) -> PredictionResult {
    let demand = forecaster::forecast(&entry.history, request.horizon, request.as_of());
    let plan = reorder::plan(&entry.product, &demand);

    debug!(
        product = %entry.product.id,
        horizon = %request.horizon,
        avg_daily_demand = demand.avg_daily_demand,
        trend = ?demand.trend.trend,
        predicted = demand.predicted_demand,
        "product forecast computed"
    );

    PredictionResult {
        product_id: entry.product.id,
        predicted_demand: demand.predicted_demand,
        confidence: demand.confidence,
        trend: demand.trend.trend,
        suggested_order_quantity: plan.suggested_order_quantity,
        days_until_stockout: plan.days_until_stockout,
    }
}

/// Inventory-state alerts for every product.
#[derive(Debug, Clone, Copy)]
pub struct AlertEvaluationJob<'a> {
    tenant_id: TenantId,
    products: &'a [&'a ProductSnapshot],
    thresholds: &'a AlertThresholds,
    generated_at: DateTime<Utc>,
}

impl<'a> AlertEvaluationJob<'a> {
    pub fn new(
        tenant_id: TenantId,
        products: &'a [&'a ProductSnapshot],
        thresholds: &'a AlertThresholds,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            tenant_id,
            products,
            thresholds,
            generated_at,
        }
    }
}

impl AnalysisJob for AlertEvaluationJob<'_> {
    type Output = Vec<Alert>;

    const NAME: &'static str = "alert_evaluation";

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    fn run(&self) -> Result<Vec<Alert>, ForecastError> {
        if !(self.thresholds.critical_stock_ratio.is_finite()
            && self.thresholds.stockout_risk_days.is_finite()
            && self.thresholds.stockout_critical_days.is_finite())
        {
            return Err(ForecastError::InvalidInput(
                "alert thresholds must be finite numbers".to_string(),
            ));
        }

        Ok(self
            .products
            .iter()
            .flat_map(|entry| {
                alerts::evaluate(&entry.product, &entry.history, self.thresholds, self.generated_at)
            })
            .collect())
    }
}
