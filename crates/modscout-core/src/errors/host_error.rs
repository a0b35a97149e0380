//! Host reflection errors.
//!
//! Raised by `Runtime`/`Reflectable` implementations. The walker absorbs
//! every variant except `SnapshotLoad`, which happens before a scan starts.

use super::error_code::{self, ModscoutErrorCode};

pub type HostResult<T> = Result<T, HostError>;

/// Errors raised while reading the audited object graph.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HostError {
    #[error("Root not found: {name}")]
    RootNotFound { name: String },

    #[error("Attribute {name} raised: {message}")]
    AttributeError { name: String, message: String },

    #[error("Metadata field {field} unavailable")]
    MetadataUnavailable { field: String },

    #[error("Dangling object reference: {id}")]
    DanglingReference { id: u64 },

    #[error("Failed to load snapshot {path}: {message}")]
    SnapshotLoad { path: String, message: String },
}

impl ModscoutErrorCode for HostError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::RootNotFound { .. } => error_code::ROOT_NOT_FOUND,
            Self::SnapshotLoad { .. } => error_code::SNAPSHOT_ERROR,
            _ => error_code::HOST_ERROR,
        }
    }
}
