//! Observability for modscout.
//! `tracing` with `EnvFilter`, per-target log levels via `MODSCOUT_LOG`.

pub mod fields;
pub mod setup;

pub use setup::init_tracing;
