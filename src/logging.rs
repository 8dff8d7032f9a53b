//! Structured logging helpers for the transaction double.
//!
//! Thin wrappers over the `tracing` crate so the double's events carry
//! consistent field names wherever they are emitted.

use tracing_subscriber::EnvFilter;

/// Install a test-friendly subscriber honoring `RUST_LOG`.
///
/// Safe to call from every test; repeated calls are no-ops.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Log a newly registered expectation.
pub fn log_expectation_registered(method: &str, times: &str) {
    tracing::debug!(method, times, "Expectation registered");
}

/// Log a dispatched call.
pub fn log_call_recorded(method: &str, args: usize, matched: bool) {
    tracing::debug!(method, args, matched, "Call recorded");
}

/// Log a call no expectation accepted.
pub fn log_unexpected_call(method: &str, args: &str) {
    tracing::warn!(method, args, "No expectation matched call");
}

/// Log a failed verification pass.
pub fn log_verification_failed(unmet: usize) {
    tracing::warn!(unmet, "Expectations unmet at verification");
}
