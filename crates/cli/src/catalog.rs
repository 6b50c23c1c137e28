use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use stockcast_core::TenantId;
use stockcast_infra::InMemorySalesHistory;
use stockcast_products::{Product, SalesObservation};

/// Catalog export handed over by the invoicing system.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    pub tenant_id: TenantId,
    pub products: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default)]
    pub sales_history: Vec<SalesObservation>,
}

impl CatalogFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("failed to parse catalog {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Split into catalog products and a history store loaded with their sales.
    pub fn into_parts(self) -> (TenantId, Vec<Product>, InMemorySalesHistory) {
        let history = InMemorySalesHistory::new();
        let mut products = Vec::with_capacity(self.products.len());
        for entry in self.products {
            history.record_all(self.tenant_id, entry.product.id, entry.sales_history);
            products.push(entry.product);
        }
        (self.tenant_id, products, history)
    }
}
