//! Diagnostic output for configuration fallbacks and failures.
//!
//! The library only emits `tracing` events; applications embedding it call
//! [`init`] once to get them printed.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding filter directives for the BTG crates.
pub const LOG_ENV: &str = "BTG_LOG";

/// Filter used when neither `BTG_LOG` nor `RUST_LOG` is set: config
/// fallbacks and saves at info, everything else at warn.
pub const DEFAULT_DIRECTIVES: &str = "warn,btg_config=info,btg_fs=info";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Install a compact stderr subscriber for configuration diagnostics.
///
/// Directives come from `BTG_LOG`, then `RUST_LOG`, then
/// [`DEFAULT_DIRECTIVES`]. Returns an error for invalid directives or when a
/// global subscriber is already installed.
pub fn init() -> Result<(), BoxError> {
    let directives = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var(EnvFilter::DEFAULT_ENV))
        .ok();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .compact();

    tracing_subscriber::registry()
        .with(build_filter(directives.as_deref())?)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

fn build_filter(directives: Option<&str>) -> Result<EnvFilter, BoxError> {
    Ok(EnvFilter::try_new(directives.unwrap_or(DEFAULT_DIRECTIVES))?)
}
