//! Product catalog records and sales history contracts.
//!
//! The catalog is owned by the surrounding invoicing system; this crate only
//! describes the read-only records it hands to the forecasting engine, plus the
//! provider contract for per-product daily sales history.

pub mod history;
pub mod product;
pub mod sales;

pub use history::{HistoryError, SalesHistoryProvider};
pub use product::Product;
pub use sales::{SalesObservation, Season};
