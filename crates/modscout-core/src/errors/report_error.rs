//! Report writing errors.

use std::path::PathBuf;

use super::error_code::{self, ModscoutErrorCode};

/// Errors that can occur while serializing or writing a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Report serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ModscoutErrorCode for ReportError {
    fn error_code(&self) -> &'static str {
        error_code::REPORT_ERROR
    }
}
