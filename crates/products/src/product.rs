use serde::{Deserialize, Serialize};

use stockcast_core::{DomainError, DomainResult, ProductId};

/// Catalog product as seen by the forecasting engine.
///
/// Stock levels are signed so that corrupt upstream records can be represented
/// and rejected by [`Product::validate`] instead of failing deserialization of a
/// whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub current_stock: i64,
    pub min_stock: i64,
    pub max_stock: i64,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price: u64,
    #[serde(default)]
    pub category: String,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            current_stock: 0,
            min_stock: 0,
            max_stock: 0,
            unit_price: 0,
            category: String::new(),
        }
    }

    pub fn with_stock(mut self, current: i64, min: i64, max: i64) -> Self {
        self.current_stock = current;
        self.min_stock = min;
        self.max_stock = max;
        self
    }

    pub fn with_unit_price(mut self, unit_price: u64) -> Self {
        self.unit_price = unit_price;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Check catalog invariants: `0 <= min_stock <= max_stock`, `current_stock >= 0`.
    pub fn validate(&self) -> DomainResult<()> {
        if self.current_stock < 0 {
            return Err(DomainError::invariant(format!(
                "current_stock cannot be negative (got {})",
                self.current_stock
            )));
        }
        if self.min_stock < 0 {
            return Err(DomainError::invariant(format!(
                "min_stock cannot be negative (got {})",
                self.min_stock
            )));
        }
        if self.min_stock > self.max_stock {
            return Err(DomainError::invariant(format!(
                "min_stock ({}) exceeds max_stock ({})",
                self.min_stock, self.max_stock
            )));
        }
        Ok(())
    }

    /// Reorder point reached (`current_stock <= min_stock`).
    pub fn at_or_below_reorder_point(&self) -> bool {
        self.current_stock <= self.min_stock
    }
}
