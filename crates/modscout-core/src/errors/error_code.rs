//! ModscoutErrorCode trait for boundary diagnostics.

/// Stable, machine-readable code for every modscout error.
pub trait ModscoutErrorCode {
    /// Returns the error code string (e.g., "CONFIG_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted diagnostic string: `[ERROR_CODE] message`.
    fn diagnostic(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const HOST_ERROR: &str = "HOST_ERROR";
pub const ROOT_NOT_FOUND: &str = "ROOT_NOT_FOUND";
pub const SNAPSHOT_ERROR: &str = "SNAPSHOT_ERROR";
pub const REPORT_ERROR: &str = "REPORT_ERROR";
