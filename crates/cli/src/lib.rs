//! `stockcast` command: run one analysis cycle over a catalog export and print the report.

pub mod catalog;
pub mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use stockcast_forecast::{AnalysisRequest, ForecastOrchestrator, ForecastReport, InventorySnapshot};
use stockcast_infra::AnalysisRunner;

pub use catalog::CatalogFile;
pub use config::Cli;

/// Load the catalog, assemble a snapshot through the history provider and run one cycle.
pub fn run(config: &Cli, catalog: CatalogFile) -> Result<Arc<ForecastReport>> {
    let (tenant_id, products, history) = catalog.into_parts();
    let snapshot = InventorySnapshot::assemble(tenant_id, products, &history)
        .context("failed to assemble inventory snapshot")?;
    info!(tenant = %tenant_id, products = snapshot.len(), horizon = %config.horizon, "catalog loaded");

    let orchestrator = Arc::new(ForecastOrchestrator::new(config.policy()));
    let runner = AnalysisRunner::new(orchestrator).with_name("stockcast-cli");
    let report = runner
        .spawn(snapshot, AnalysisRequest::now(config.horizon))
        .context("failed to start analysis thread")?
        .wait()?;
    Ok(report)
}
