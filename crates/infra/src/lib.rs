//! Infrastructure layer: history read models and background analysis execution.

pub mod forecasting;
pub mod read_model;

pub use forecasting::{AnalysisHandle, AnalysisRunner, InMemoryReportSink, ReportSink};
pub use read_model::InMemorySalesHistory;
