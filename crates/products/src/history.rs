use thiserror::Error;

use stockcast_core::{ProductId, TenantId};

use crate::sales::SalesObservation;

/// Failure to read sales history from the backing store.
///
/// This is an infrastructure failure, distinct from "no sales recorded": a
/// product with no history is an empty `Vec`, not an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("sales history unavailable: {0}")]
    Unavailable(String),
}

/// Read-only source of per-product daily sales history.
///
/// Implementations return observations ordered oldest-to-newest. The engine
/// never writes back through this interface.
pub trait SalesHistoryProvider: Send + Sync {
    fn sales_history(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Vec<SalesObservation>, HistoryError>;
}
