//! Observability for the ramp engine.
//! `tracing` crate with `EnvFilter`, per-subsystem log levels.

pub mod fields;
pub mod setup;

pub use setup::init_tracing;
