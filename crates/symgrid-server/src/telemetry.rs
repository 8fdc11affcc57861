//! Logging setup.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,symgrid_server=debug,symgrid_world=debug,tower_http=debug";

/// Install the global subscriber. JSON lines when `SYMGRID_LOG_JSON` is set.
pub fn init_telemetry() -> Result<()> {
    let json = std::env::var_os("SYMGRID_LOG_JSON").is_some();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer().with_target(true)))
        .try_init()?;

    info!(json, "Telemetry initialized");
    Ok(())
}
