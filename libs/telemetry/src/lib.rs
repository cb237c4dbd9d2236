//! Tracing setup shared by pagebot services.

use std::sync::OnceLock;

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: OnceLock<()> = OnceLock::new();

/// Installs the fmt subscriber configured from `RUST_LOG` (default `info`).
/// Safe to call more than once; later calls are no-ops, so tests and the
/// binary can both install freely.
pub fn install(service_name: &str) -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .ok();

    INIT.set(()).ok();
    tracing::info!(service = %service_name, "telemetry installed");
    Ok(())
}
