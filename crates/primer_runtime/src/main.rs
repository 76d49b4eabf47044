//! Primer Runtime
//!
//! Host binary: loads the packaged script and injects it into a headless
//! surface once the placeholder document is ready.

mod host;

use anyhow::Result;
use primer_services::Settings;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> Result<()> {
    let settings_path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = Settings::discover(settings_path.as_deref())?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Primer v{}", VERSION);

    let report = host::run(&settings, settings_path.as_deref())?;
    tracing::info!(
        asset = %report.asset,
        bytes = report.payload_bytes,
        injections = report.injections,
        state = ?report.state,
        "runtime finished"
    );

    Ok(())
}
