//! Structured logging setup.
//!
//! Library code only emits `tracing` events. Binaries and test harnesses
//! that want to see them call [`init`] once. `RUST_LOG` overrides the
//! default `buscar=info` filter.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::result::{BuscarError, BuscarResult};

/// Default filter directive when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "buscar=info";

/// Output format of the global subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a human-readable global subscriber.
///
/// # Errors
/// Returns error if a global subscriber is already installed.
pub fn init() -> BuscarResult<()> {
    init_with(LogFormat::Pretty)
}

/// Install a global subscriber with the given format.
///
/// # Errors
/// Returns error if a global subscriber is already installed.
pub fn init_with(format: LogFormat) -> BuscarResult<()> {
    let registry = tracing_subscriber::registry().with(filter());
    let installed = match format {
        LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json().with_target(true)).try_init(),
    };
    installed.map_err(|e| BuscarError::config(format!("logging already initialized: {e}")))
}
