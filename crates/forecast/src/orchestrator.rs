//! Single entry point of the engine.
//!
//! Lifecycle per analysis cycle: `Idle -> Analyzing -> Idle`. A request that
//! arrives while a cycle is `Analyzing` is **rejected** with
//! [`ForecastError::AnalysisInProgress`]; callers retry after completion.
//!
//! The published report is the only shared mutable state. It is replaced by a
//! single assignment of a new `Arc<ForecastReport>`, so readers observe either
//! the previous report or the new one, never a mix. A publish derived from a
//! different snapshot than the current report drops the other collection
//! instead of leaving it stale. Forecast-derived alerts always follow the
//! predictions they are published with.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::alerts::{self, Alert};
use crate::error::{Diagnostic, ForecastError};
use crate::horizon::{AnalysisRequest, Horizon};
use crate::job::{AlertEvaluationJob, AnalysisJob, DemandForecastJob};
use crate::policy::ForecastPolicy;
use crate::report::{ForecastReport, PredictionResult, ReportSummary};
use crate::snapshot::{InventorySnapshot, ProductSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisState {
    Idle,
    Analyzing,
}

#[derive(Debug)]
pub struct ForecastOrchestrator {
    policy: ForecastPolicy,
    analyzing: AtomicBool,
    published: RwLock<Option<Arc<ForecastReport>>>,
}

impl Default for ForecastOrchestrator {
    fn default() -> Self {
        Self::new(ForecastPolicy::default())
    }
}

impl ForecastOrchestrator {
    pub fn new(policy: ForecastPolicy) -> Self {
        Self {
            policy,
            analyzing: AtomicBool::new(false),
            published: RwLock::new(None),
        }
    }

    pub fn policy(&self) -> &ForecastPolicy {
        &self.policy
    }

    pub fn state(&self) -> AnalysisState {
        if self.analyzing.load(Ordering::Acquire) {
            AnalysisState::Analyzing
        } else {
            AnalysisState::Idle
        }
    }

    /// Most recently published report; `None` until the first run completes.
    pub fn latest(&self) -> Option<Arc<ForecastReport>> {
        self.published
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Forecast every valid product in `snapshot`, in input order, and publish the predictions.
    ///
    /// Inventory alerts already published for the same snapshot are kept;
    /// forecast-derived alerts are rebuilt from the new predictions.
    pub fn run_analysis(
        &self,
        snapshot: &InventorySnapshot,
        request: AnalysisRequest,
    ) -> Result<Vec<PredictionResult>, ForecastError> {
        let _cycle = self.begin()?;
        info!(
            tenant = %snapshot.tenant_id,
            snapshot = %snapshot.id,
            horizon = %request.horizon,
            products = snapshot.len(),
            "demand analysis started"
        );

        let (valid, diagnostics) = snapshot.partition();
        let predictions = execute(DemandForecastJob::new(snapshot.tenant_id, &valid, request))?;
        let derived = self.derived_alerts(&valid, &predictions, request.generated_at);
        self.hold();

        let report = self.publish(|current| {
            let mut alerts: Vec<Alert> = match current {
                Some(report) if report.snapshot_id == snapshot.id => report
                    .alerts
                    .iter()
                    .filter(|a| !a.kind.is_forecast_derived())
                    .cloned()
                    .collect(),
                _ => Vec::new(),
            };
            alerts.extend(derived);
            self.build_report(
                snapshot,
                request.generated_at,
                Some(request.horizon),
                predictions,
                alerts,
                diagnostics,
            )
        });

        info!(
            tenant = %snapshot.tenant_id,
            snapshot = %snapshot.id,
            predictions = report.predictions.len(),
            "demand analysis published"
        );
        Ok(report.predictions.clone())
    }

    /// Evaluate inventory alerts for every valid product and publish them.
    ///
    /// Predictions already published for the same snapshot are kept, together
    /// with the forecast-derived alerts they imply. Ordering of the returned
    /// alerts is unspecified.
    pub fn evaluate_alerts(
        &self,
        snapshot: &InventorySnapshot,
        generated_at: DateTime<Utc>,
    ) -> Result<Vec<Alert>, ForecastError> {
        let _cycle = self.begin()?;

        let (valid, diagnostics) = snapshot.partition();
        let evaluated = execute(AlertEvaluationJob::new(
            snapshot.tenant_id,
            &valid,
            &self.policy.alerts,
            generated_at,
        ))?;
        self.hold();

        let report = self.publish(|current| {
            let (horizon, predictions) = match current {
                Some(report) if report.snapshot_id == snapshot.id => {
                    (report.horizon, report.predictions.clone())
                }
                _ => (None, Vec::new()),
            };
            let mut alerts = evaluated;
            alerts.extend(self.derived_alerts(&valid, &predictions, generated_at));
            self.build_report(
                snapshot,
                generated_at,
                horizon,
                predictions,
                alerts,
                diagnostics,
            )
        });

        info!(
            tenant = %snapshot.tenant_id,
            snapshot = %snapshot.id,
            alerts = report.alerts.len(),
            "alerts published"
        );
        Ok(report.alerts.clone())
    }

    /// Full cycle: predictions and alerts from one snapshot, published together.
    pub fn analyze(
        &self,
        snapshot: &InventorySnapshot,
        request: AnalysisRequest,
    ) -> Result<Arc<ForecastReport>, ForecastError> {
        let _cycle = self.begin()?;
        info!(
            tenant = %snapshot.tenant_id,
            snapshot = %snapshot.id,
            horizon = %request.horizon,
            products = snapshot.len(),
            "analysis cycle started"
        );

        let (valid, diagnostics) = snapshot.partition();
        let predictions = execute(DemandForecastJob::new(snapshot.tenant_id, &valid, request))?;
        let mut alerts = execute(AlertEvaluationJob::new(
            snapshot.tenant_id,
            &valid,
            &self.policy.alerts,
            request.generated_at,
        ))?;
        alerts.extend(self.derived_alerts(&valid, &predictions, request.generated_at));
        self.hold();

        let report = self.publish(|_| {
            self.build_report(
                snapshot,
                request.generated_at,
                Some(request.horizon),
                predictions,
                alerts,
                diagnostics,
            )
        });

        info!(
            tenant = %report.tenant_id,
            snapshot = %report.snapshot_id,
            predictions = report.predictions.len(),
            alerts = report.alerts.len(),
            skipped = report.diagnostics.len(),
            "analysis cycle published"
        );
        Ok(report)
    }

    fn begin(&self) -> Result<CycleGuard<'_>, ForecastError> {
        self.analyzing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ForecastError::AnalysisInProgress)?;
        Ok(CycleGuard(&self.analyzing))
    }

    fn hold(&self) {
        if !self.policy.simulated_latency.is_zero() {
            thread::sleep(self.policy.simulated_latency);
        }
    }

    /// Forecast-derived alerts for `predictions`; empty unless the policy enables them.
    ///
    /// `predictions` must have been computed from `valid`, in the same order.
    fn derived_alerts(
        &self,
        valid: &[&ProductSnapshot],
        predictions: &[PredictionResult],
        created_at: DateTime<Utc>,
    ) -> Vec<Alert> {
        if !self.policy.forecast_alerts {
            return Vec::new();
        }
        valid
            .iter()
            .zip(predictions)
            .filter(|(entry, prediction)| entry.product.id == prediction.product_id)
            .flat_map(|(entry, prediction)| {
                alerts::forecast_alerts(&entry.product, prediction, created_at)
            })
            .collect()
    }

    fn publish(
        &self,
        next: impl FnOnce(Option<&ForecastReport>) -> ForecastReport,
    ) -> Arc<ForecastReport> {
        let mut slot = self
            .published
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let report = Arc::new(next(slot.as_deref()));
        *slot = Some(Arc::clone(&report));
        report
    }

    fn build_report(
        &self,
        snapshot: &InventorySnapshot,
        generated_at: DateTime<Utc>,
        horizon: Option<Horizon>,
        predictions: Vec<PredictionResult>,
        alerts: Vec<Alert>,
        diagnostics: Vec<Diagnostic>,
    ) -> ForecastReport {
        let summary = ReportSummary::compute(
            snapshot.len().saturating_sub(diagnostics.len()),
            &predictions,
            &alerts,
            self.policy.stockout_warning_days,
        );
        ForecastReport {
            snapshot_id: snapshot.id,
            tenant_id: snapshot.tenant_id,
            generated_at,
            horizon,
            predictions,
            alerts,
            diagnostics,
            summary,
        }
    }
}

fn execute<J: AnalysisJob>(job: J) -> Result<J::Output, ForecastError> {
    debug!(tenant = %job.tenant_id(), job = J::NAME, "running analysis job");
    job.run()
}

/// Returns the orchestrator to `Idle` when the cycle ends, including on error.
struct CycleGuard<'a>(&'a AtomicBool);

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::{AlertKind, Severity};
    use crate::policy::AlertThresholds;
    use std::sync::atomic::AtomicUsize;
    use crate::reorder::DaysUntilStockout;
    use crate::trend::Trend;
    use chrono::{Days, NaiveDate, TimeZone};
    use stockcast_core::{ProductId, TenantId};
    use stockcast_products::{Product, SalesObservation};

    fn at(month: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, month, 15, 8, 30, 0).unwrap()
    }

    fn series(quantities: &[u32]) -> Vec<SalesObservation> {
        let start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        quantities
            .iter()
            .enumerate()
            .map(|(i, q)| SalesObservation::new(start + Days::new(i as u64), *q))
            .collect()
    }

    fn entry(name: &str, current: i64, min: i64, max: i64, quantities: &[u32]) -> ProductSnapshot {
        ProductSnapshot::new(
            Product::new(ProductId::new(), name).with_stock(current, min, max),
            series(quantities),
        )
    }

    fn catalog(tenant: TenantId) -> InventorySnapshot {
        InventorySnapshot::new(
            tenant,
            vec![
                entry("Laptop", 25, 10, 100, &[5; 30]),
                entry("Wireless Mouse", 5, 15, 200, &[0; 30]),
                entry("Broken Record", 5, 50, 10, &[3; 30]),
            ],
        )
    }

    #[test]
    fn cold_start_has_no_report() {
        let orchestrator = ForecastOrchestrator::default();
        assert!(orchestrator.latest().is_none());
        assert_eq!(orchestrator.state(), AnalysisState::Idle);
    }

    #[test]
    fn empty_snapshot_yields_empty_results() {
        let orchestrator = ForecastOrchestrator::default();
        let snapshot = InventorySnapshot::empty(TenantId::new());
        let request = AnalysisRequest::new(Horizon::Month, at(6));
        assert!(orchestrator.run_analysis(&snapshot, request).unwrap().is_empty());
        assert!(orchestrator.evaluate_alerts(&snapshot, at(6)).unwrap().is_empty());
        let report = orchestrator.analyze(&snapshot, request).unwrap();
        assert!(report.predictions.is_empty());
        assert_eq!(report.summary.products_monitored, 0);
    }

    #[test]
    fn run_analysis_preserves_input_order_and_skips_invalid() {
        let orchestrator = ForecastOrchestrator::default();
        let snapshot = catalog(TenantId::new());
        let predictions = orchestrator
            .run_analysis(&snapshot, AnalysisRequest::new(Horizon::Month, at(6)))
            .unwrap();

        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].product_id, snapshot.products[0].product.id);
        assert_eq!(predictions[1].product_id, snapshot.products[1].product.id);

        let laptop = &predictions[0];
        assert_eq!(laptop.predicted_demand, 150);
        assert_eq!(laptop.trend, Trend::Stable);
        assert_eq!(laptop.suggested_order_quantity, 135);
        assert_eq!(laptop.days_until_stockout, DaysUntilStockout::Days(5));

        let mouse = &predictions[1];
        assert_eq!(mouse.confidence, 65.0);
        assert_eq!(mouse.days_until_stockout, DaysUntilStockout::Never);
        assert_eq!(mouse.suggested_order_quantity, 10);

        let report = orchestrator.latest().unwrap();
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].product_name, "Broken Record");
        assert_eq!(report.horizon, Some(Horizon::Month));
        assert!(report.alerts.is_empty());
    }

    #[test]
    fn analyze_publishes_predictions_and_alerts_together() {
        let orchestrator = ForecastOrchestrator::default();
        let snapshot = catalog(TenantId::new());
        let report = orchestrator
            .analyze(&snapshot, AnalysisRequest::new(Horizon::Week, at(12)))
            .unwrap();

        assert_eq!(report.snapshot_id, snapshot.id);
        assert_eq!(report.predictions.len(), 2);
        // Laptop: 5/day over the last week, 25 in stock -> exactly 5 days left.
        // Mouse: below half its floor.
        let mut kinds: Vec<(String, AlertKind, Severity)> = report
            .alerts
            .iter()
            .map(|a| (a.product_name.clone(), a.kind, a.severity))
            .collect();
        kinds.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            kinds,
            vec![
                ("Laptop".to_string(), AlertKind::StockoutRisk, Severity::Medium),
                ("Wireless Mouse".to_string(), AlertKind::LowStock, Severity::High),
            ]
        );
        assert!(report.alerts.iter().all(|a| a.created_at == at(12)));

        assert_eq!(report.summary.products_monitored, 2);
        assert_eq!(report.summary.active_alerts, 2);
        assert_eq!(report.summary.imminent_stockouts, 1);
        assert!(Arc::ptr_eq(&report, &orchestrator.latest().unwrap()));
    }

    #[test]
    fn rerun_replaces_previous_report_wholesale() {
        let orchestrator = ForecastOrchestrator::default();
        let tenant = TenantId::new();
        let first = catalog(tenant);
        orchestrator
            .analyze(&first, AnalysisRequest::new(Horizon::Month, at(6)))
            .unwrap();

        let second = InventorySnapshot::new(tenant, vec![entry("Monitor", 15, 8, 50, &[1; 30])]);
        let predictions = orchestrator
            .run_analysis(&second, AnalysisRequest::new(Horizon::Quarter, at(6)))
            .unwrap();
        assert_eq!(predictions.len(), 1);

        let report = orchestrator.latest().unwrap();
        assert_eq!(report.snapshot_id, second.id);
        assert_eq!(report.horizon, Some(Horizon::Quarter));
        // Alerts computed from the first snapshot must not survive next to new predictions.
        assert!(report.alerts.is_empty());
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn alerts_then_predictions_on_same_snapshot_are_merged_into_one_report() {
        let orchestrator = ForecastOrchestrator::default();
        let snapshot = catalog(TenantId::new());
        let alerts = orchestrator.evaluate_alerts(&snapshot, at(6)).unwrap();
        assert_eq!(orchestrator.latest().unwrap().horizon, None);

        orchestrator
            .run_analysis(&snapshot, AnalysisRequest::new(Horizon::Week, at(6)))
            .unwrap();
        let report = orchestrator.latest().unwrap();
        assert_eq!(report.alerts, alerts);
        assert_eq!(report.predictions.len(), 2);
    }

    #[test]
    fn identical_inputs_are_idempotent() {
        let orchestrator = ForecastOrchestrator::default();
        let snapshot = catalog(TenantId::new());
        let request = AnalysisRequest::new(Horizon::Month, at(11));
        let a = orchestrator.run_analysis(&snapshot, request).unwrap();
        let b = orchestrator.run_analysis(&snapshot, request).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn concurrent_request_is_rejected_while_analyzing() {
        let orchestrator = ForecastOrchestrator::default();
        let _held = orchestrator.begin().unwrap();
        assert_eq!(orchestrator.state(), AnalysisState::Analyzing);

        let snapshot = catalog(TenantId::new());
        let err = orchestrator
            .run_analysis(&snapshot, AnalysisRequest::new(Horizon::Month, at(6)))
            .unwrap_err();
        assert_eq!(err, ForecastError::AnalysisInProgress);
        assert!(orchestrator.latest().is_none());
    }

    #[test]
    fn failed_cycle_returns_to_idle() {
        let thresholds = AlertThresholds {
            critical_stock_ratio: f64::NAN,
            ..AlertThresholds::default()
        };
        let orchestrator =
            ForecastOrchestrator::new(ForecastPolicy::default().with_alert_thresholds(thresholds));
        let err = orchestrator
            .analyze(&catalog(TenantId::new()), AnalysisRequest::new(Horizon::Month, at(6)))
            .unwrap_err();
        assert!(matches!(err, ForecastError::InvalidInput(_)));
        assert_eq!(orchestrator.state(), AnalysisState::Idle);
        assert!(orchestrator.latest().is_none());
    }

    #[test]
    fn alerts_on_new_snapshot_clear_earlier_predictions() {
        let orchestrator = ForecastOrchestrator::default();
        let tenant = TenantId::new();
        orchestrator
            .analyze(&catalog(tenant), AnalysisRequest::new(Horizon::Month, at(6)))
            .unwrap();

        let second = InventorySnapshot::new(tenant, vec![entry("Monitor", 2, 8, 50, &[1; 30])]);
        let alerts = orchestrator.evaluate_alerts(&second, at(7)).unwrap();
        assert_eq!(alerts.len(), 2);

        let report = orchestrator.latest().unwrap();
        assert_eq!(report.snapshot_id, second.id);
        assert_eq!(report.horizon, None);
        assert!(report.predictions.is_empty());
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.summary.products_monitored, 1);
        assert!(report.alerts.iter().all(|a| a.product_name == "Monitor"));
    }

    fn assert_suggestions_match_predictions(report: &ForecastReport) {
        let suggestions: Vec<&Alert> = report
            .alerts
            .iter()
            .filter(|a| a.kind == AlertKind::OrderSuggestion)
            .collect();
        let ordering = report
            .predictions
            .iter()
            .filter(|p| p.suggested_order_quantity > 0)
            .count();
        assert_eq!(suggestions.len(), ordering);
        for alert in suggestions {
            let prediction = report
                .predictions
                .iter()
                .find(|p| p.product_id == alert.product_id)
                .unwrap();
            assert_eq!(
                alert.message,
                format!("Suggested purchase order: {} units", prediction.suggested_order_quantity)
            );
        }
    }

    #[test]
    fn forecast_alerts_follow_the_latest_predictions() {
        let orchestrator =
            ForecastOrchestrator::new(ForecastPolicy::default().with_forecast_alerts(true));
        let snapshot = catalog(TenantId::new());

        let quarter = orchestrator
            .analyze(&snapshot, AnalysisRequest::new(Horizon::Quarter, at(6)))
            .unwrap();
        assert_eq!(quarter.predictions[0].suggested_order_quantity, 435);
        assert_suggestions_match_predictions(&quarter);

        orchestrator
            .run_analysis(&snapshot, AnalysisRequest::new(Horizon::Week, at(6)))
            .unwrap();
        let week = orchestrator.latest().unwrap();
        assert_eq!(week.horizon, Some(Horizon::Week));
        assert_eq!(week.predictions[0].suggested_order_quantity, 20);
        assert_suggestions_match_predictions(&week);
        // Inventory alerts from the same snapshot are carried over unchanged.
        let inventory = |r: &ForecastReport| -> Vec<Alert> {
            r.alerts
                .iter()
                .filter(|a| !a.kind.is_forecast_derived())
                .cloned()
                .collect()
        };
        assert_eq!(inventory(&week), inventory(&quarter));

        orchestrator.evaluate_alerts(&snapshot, at(7)).unwrap();
        let refreshed = orchestrator.latest().unwrap();
        assert_eq!(refreshed.predictions, week.predictions);
        assert_suggestions_match_predictions(&refreshed);
        assert!(refreshed.alerts.iter().all(|a| a.created_at == at(7)));
    }

    #[derive(Clone, Default)]
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarnCounter {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn invalid_product_is_reported_once_per_cycle() {
        use tracing_subscriber::layer::SubscriberExt;

        let counter = WarnCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());
        let snapshot = catalog(TenantId::new());

        let report = tracing::subscriber::with_default(subscriber, || {
            ForecastOrchestrator::default()
                .analyze(&snapshot, AnalysisRequest::new(Horizon::Month, at(6)))
                .unwrap()
        });

        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn forecast_alerts_are_opt_in() {
        let snapshot = catalog(TenantId::new());
        let request = AnalysisRequest::new(Horizon::Month, at(6));

        let plain = ForecastOrchestrator::default().analyze(&snapshot, request).unwrap();
        assert!(plain.alerts.iter().all(|a| a.kind != AlertKind::OrderSuggestion));

        let enriched = ForecastOrchestrator::new(ForecastPolicy::default().with_forecast_alerts(true))
            .analyze(&snapshot, request)
            .unwrap();
        let suggestions = enriched
            .alerts
            .iter()
            .filter(|a| a.kind == AlertKind::OrderSuggestion)
            .count();
        assert_eq!(suggestions, 2);
    }
}
