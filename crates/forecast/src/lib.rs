//! `stockcast-forecast`
//!
//! **Responsibility:** demand forecasting, reorder planning and inventory alerts.
//!
//! This crate is deterministic arithmetic over an immutable snapshot:
//! - It must not mutate catalog records or sales history.
//! - It does no IO; history arrives through [`InventorySnapshot::assemble`] or
//!   is supplied directly by the caller.
//! - It emits **derived results** (predictions, alerts) that are regenerated on
//!   every run and never persisted here.

pub mod alerts;
pub mod error;
pub mod forecaster;
pub mod horizon;
pub mod job;
pub mod orchestrator;
pub mod policy;
pub mod reorder;
pub mod report;
pub mod seasonality;
pub mod snapshot;
pub mod trend;

pub use alerts::{Alert, AlertKind, Severity};
pub use error::{Diagnostic, ForecastError};
pub use forecaster::DemandForecast;
pub use horizon::{AnalysisRequest, Horizon};
pub use job::{AlertEvaluationJob, AnalysisJob, DemandForecastJob};
pub use orchestrator::{AnalysisState, ForecastOrchestrator};
pub use policy::{AlertThresholds, ForecastPolicy};
pub use reorder::{DaysUntilStockout, ReorderPlan};
pub use report::{ForecastReport, PredictionResult, ReportSummary};
pub use snapshot::{InventorySnapshot, ProductSnapshot};
pub use trend::{Trend, TrendStats};
