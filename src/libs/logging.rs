//! Debug logging setup.

use anyhow::{anyhow, Result};
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

pub const DEBUG_ENV: &str = "PLANTY_DEBUG";

/// Installs the fmt subscriber on stderr.
///
/// Nothing is installed unless `PLANTY_DEBUG` or `RUST_LOG` is set; the
/// `msg_*` macros print plain lines in that case. `RUST_LOG` takes precedence
/// as a filter, `PLANTY_DEBUG` alone enables `debug` for this crate.
pub fn init() -> Result<()> {
    if !crate::libs::messages::macros::is_debug_mode() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("planty=debug,warn"))
        .map_err(|e| anyhow!("invalid RUST_LOG filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        tracing::debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
