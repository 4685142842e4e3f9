// src/signal.rs

//! Provides signal handling for graceful shutdown.

use crate::cancellation::CancellationToken;
use anyhow::{Context, Result};

/// Sets up a handler for Ctrl+C (SIGINT, and SIGTERM on Unix).
///
/// When the signal is caught the returned token is cancelled, which aborts
/// every in-flight remote call of a [`CallContext`](crate::CallContext)
/// built from it. A second signal terminates the process immediately.
///
/// # Errors
/// Returns an error if the signal handler cannot be set.
pub fn setup_signal_handler() -> Result<CancellationToken> {
    let token = CancellationToken::new();
    let t = token.clone();

    ctrlc::set_handler(move || {
        if t.is_cancelled() {
            std::process::exit(130);
        }
        log::info!("Ctrl+C signal received, cancelling remote calls.");
        t.cancel();
    })
    .context("Failed to set Ctrl+C signal handler")?;

    Ok(token)
}
