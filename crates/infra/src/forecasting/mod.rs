//! Forecast execution adapters.
//!
//! These components run analysis cycles off the caller's thread and hand the
//! published reports to a sink. Failures are reported through the handle and
//! never affect the published report.

pub mod analysis_runner;

pub use analysis_runner::{AnalysisHandle, AnalysisRunner, InMemoryReportSink, ReportSink};
