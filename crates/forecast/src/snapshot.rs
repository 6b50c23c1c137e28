use serde::{Deserialize, Serialize};
use tracing::warn;

use stockcast_core::{SnapshotId, TenantId};
use stockcast_products::{HistoryError, Product, SalesHistoryProvider, SalesObservation};

use crate::error::Diagnostic;

/// One product plus its sales history, ordered oldest-to-newest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub product: Product,
    #[serde(default)]
    pub history: Vec<SalesObservation>,
}

impl ProductSnapshot {
    pub fn new(product: Product, history: Vec<SalesObservation>) -> Self {
        Self { product, history }
    }
}

/// Immutable, tenant-scoped input of one analysis run.
///
/// Every output of a run is derived from exactly one snapshot; the snapshot id
/// is how published reports tell runs apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub id: SnapshotId,
    pub tenant_id: TenantId,
    pub products: Vec<ProductSnapshot>,
}

impl InventorySnapshot {
    pub fn new(tenant_id: TenantId, products: Vec<ProductSnapshot>) -> Self {
        Self {
            id: SnapshotId::new(),
            tenant_id,
            products,
        }
    }

    pub fn empty(tenant_id: TenantId) -> Self {
        Self::new(tenant_id, Vec::new())
    }

    /// Build a snapshot by reading each product's history from `provider`.
    ///
    /// A provider failure aborts the assembly: a partially loaded snapshot would
    /// silently under-report demand.
    pub fn assemble<P>(
        tenant_id: TenantId,
        products: Vec<Product>,
        provider: &P,
    ) -> Result<Self, HistoryError>
    where
        P: SalesHistoryProvider + ?Sized,
    {
        let mut entries = Vec::with_capacity(products.len());
        for product in products {
            let history = provider.sales_history(tenant_id, product.id)?;
            entries.push(ProductSnapshot::new(product, history));
        }
        Ok(Self::new(tenant_id, entries))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Split into products that satisfy catalog invariants and diagnostics for the rest.
    pub(crate) fn partition(&self) -> (Vec<&ProductSnapshot>, Vec<Diagnostic>) {
        let mut valid = Vec::with_capacity(self.products.len());
        let mut rejected = Vec::new();

        for entry in &self.products {
            match entry.product.validate() {
                Ok(()) => valid.push(entry),
                Err(e) => {
                    warn!(
                        tenant = %self.tenant_id,
                        product = %entry.product.id,
                        error = %e,
                        "skipping invalid product"
                    );
                    rejected.push(Diagnostic::rejected(entry.product.id, &entry.product.name, &e));
                }
            }
        }

        (valid, rejected)
    }
}
