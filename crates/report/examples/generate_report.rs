//! Fetch one inspection from the backend and save its report
//! Run with: cargo run -p report --example generate_report -- <id> [config.json]
//!
//! The backend is configured through STCH_API_URL, STCH_API_TOKEN and
//! STCH_API_TIMEOUT_SECS. Set RUST_LOG=debug to follow each build stage.

use inspection::{HttpInspectionService, ServiceConfig};
use report::{DocumentSaver, FileSaver, ReportAssets, ReportBuilder, ReportConfig, SaveOutcome};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let id = args.next().unwrap_or_default();
    let config = match args.next() {
        Some(path) => ReportConfig::from_file(path)?,
        None => ReportConfig::default(),
    };

    let service = HttpInspectionService::new(ServiceConfig::from_env())?;
    let builder = ReportBuilder::new(service, ReportAssets::load(&config), config.clone());

    let report = builder.build_inspection_report(&id).await?;
    for warning in &report.warnings {
        println!("warning: {warning}");
    }

    match FileSaver::from_config(&config).save(&report.document, report.document.basename()) {
        SaveOutcome::Saved(path) => println!("Saved {}", path.display()),
        SaveOutcome::Downloaded => println!("Downloaded"),
        SaveOutcome::Failed(reason) => anyhow::bail!("could not save report: {reason}"),
    }

    Ok(())
}
