use anyhow::Result;
use clap::Parser;

use stockcast_cli::{CatalogFile, Cli};

fn main() -> Result<()> {
    stockcast_observability::init();

    let cli = Cli::parse();
    let catalog = CatalogFile::load(&cli.catalog_path)?;

    let report = stockcast_cli::run(&cli, catalog)?;
    println!("{}", serde_json::to_string_pretty(&*report)?);
    Ok(())
}
