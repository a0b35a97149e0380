//! Error handling for modscout.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.
//!
//! A scan never returns an error: per-item failures are absorbed inside
//! the walker. Only configuration, snapshot loading and report writing
//! can fail, and those surface at the boundary.

pub mod config_error;
pub mod error_code;
pub mod host_error;
pub mod report_error;

pub use config_error::ConfigError;
pub use error_code::ModscoutErrorCode;
pub use host_error::{HostError, HostResult};
pub use report_error::ReportError;
