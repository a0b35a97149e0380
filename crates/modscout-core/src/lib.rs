//! modscout-core: shared foundation for the modscout object-graph auditor.
//!
//! - Types: host-assigned node identities and fast collections
//! - Errors: one `thiserror` enum per subsystem
//! - Config: JSON/TOML configuration with layered overrides
//! - Tracing: `MODSCOUT_LOG`-driven subscriber setup
//! - Constants: compiled defaults and the built-in category tables

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;
