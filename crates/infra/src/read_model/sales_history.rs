use std::collections::HashMap;
use std::sync::RwLock;

use stockcast_core::{ProductId, TenantId};
use stockcast_products::{HistoryError, SalesHistoryProvider, SalesObservation};

/// In-memory, tenant-isolated sales history for tests/dev and the CLI.
///
/// Each series is kept sorted by date with at most one observation per day;
/// recording a day twice replaces the earlier entry.
#[derive(Debug, Default)]
pub struct InMemorySalesHistory {
    inner: RwLock<HashMap<(TenantId, ProductId), Vec<SalesObservation>>>,
}

impl InMemorySalesHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, tenant_id: TenantId, product_id: ProductId, observation: SalesObservation) {
        let mut map = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let series = map.entry((tenant_id, product_id)).or_default();
        match series.binary_search_by_key(&observation.date, |o| o.date) {
            Ok(i) => series[i] = observation,
            Err(i) => series.insert(i, observation),
        }
    }

    pub fn record_all(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        observations: impl IntoIterator<Item = SalesObservation>,
    ) {
        for observation in observations {
            self.record(tenant_id, product_id, observation);
        }
    }

    /// Drop all history for a tenant (reload support).
    pub fn clear_tenant(&self, tenant_id: TenantId) {
        let mut map = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        map.retain(|(t, _), _| *t != tenant_id);
    }
}

impl SalesHistoryProvider for InMemorySalesHistory {
    fn sales_history(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Vec<SalesObservation>, HistoryError> {
        let map = self
            .inner
            .read()
            .map_err(|_| HistoryError::Unavailable("sales history lock poisoned".to_string()))?;
        Ok(map.get(&(tenant_id, product_id)).cloned().unwrap_or_default())
    }
}
