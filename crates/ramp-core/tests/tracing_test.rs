//! Tests for the tracing setup.

use std::sync::Mutex;

use ramp_core::tracing::init_tracing;

/// Serializes tests that touch `RAMP_LOG`.
static TRACING_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_ramp_log_filter_accepted() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("RAMP_LOG", "ramp_analysis::compliance=debug,ramp_analysis::topology=warn");
    init_tracing();
    std::env::remove_var("RAMP_LOG");
}

#[test]
fn test_init_tracing_idempotent() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    init_tracing();
    init_tracing();
}

#[test]
fn test_invalid_ramp_log_falls_back() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("RAMP_LOG", "this_is_garbage=not_a_level=at_all");
    init_tracing();
    std::env::remove_var("RAMP_LOG");
}
