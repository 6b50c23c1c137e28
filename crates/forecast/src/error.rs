use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockcast_core::{DomainError, ProductId};
use stockcast_products::HistoryError;

/// Run-level failure of the forecasting engine.
///
/// Sparse or zero-activity data is never an error; it degrades to minimum
/// confidence and the no-stockout sentinel instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastError {
    #[error("invalid analysis input: {0}")]
    InvalidInput(String),

    #[error("an analysis is already in progress; retry once it completes")]
    AnalysisInProgress,

    #[error("analysis worker stopped before reporting a result")]
    WorkerLost,

    #[error(transparent)]
    History(#[from] HistoryError),
}

/// A product excluded from a run, with the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub product_id: ProductId,
    pub product_name: String,
    pub reason: String,
}

impl Diagnostic {
    pub fn rejected(product_id: ProductId, product_name: &str, reason: &DomainError) -> Self {
        Self {
            product_id,
            product_name: product_name.to_string(),
            reason: reason.to_string(),
        }
    }
}
