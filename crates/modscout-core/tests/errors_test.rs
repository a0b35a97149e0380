//! Tests for the modscout error handling system.

use std::path::PathBuf;

use modscout_core::errors::*;

/// T1-ERR-01: Every error enum carries an error code.
#[test]
fn test_all_errors_have_error_code() {
    let config = ConfigError::FileNotFound {
        path: "modscan.json".into(),
    };
    assert_eq!(config.error_code(), "CONFIG_ERROR");

    let host = HostError::AttributeError {
        name: "x".into(),
        message: "boom".into(),
    };
    assert_eq!(host.error_code(), "HOST_ERROR");

    let report = ReportError::Io {
        path: PathBuf::from("/nonexistent/report.json"),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
    };
    assert_eq!(report.error_code(), "REPORT_ERROR");
}

/// T1-ERR-02: Host errors distinguish root and snapshot failures.
#[test]
fn test_host_error_codes() {
    let root = HostError::RootNotFound {
        name: "nosuchmod".into(),
    };
    assert_eq!(root.error_code(), "ROOT_NOT_FOUND");

    let snapshot = HostError::SnapshotLoad {
        path: "dump.json".into(),
        message: "eof".into(),
    };
    assert_eq!(snapshot.error_code(), "SNAPSHOT_ERROR");

    assert_eq!(
        HostError::DanglingReference { id: 9 }.error_code(),
        "HOST_ERROR"
    );
}

/// T1-ERR-03: diagnostic() prefixes the code.
#[test]
fn test_diagnostic_format() {
    let err = ConfigError::ValidationFailed {
        field: "scan.max_objects".into(),
        message: "must be greater than 0".into(),
    };
    assert_eq!(
        err.diagnostic(),
        "[CONFIG_ERROR] Config validation failed for scan.max_objects: must be greater than 0"
    );

    let err = HostError::RootNotFound {
        name: "random".into(),
    };
    assert_eq!(err.diagnostic(), "[ROOT_NOT_FOUND] Root not found: random");
}

/// T1-ERR-04: serde_json errors convert into ReportError.
#[test]
fn test_report_error_from_serde() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: ReportError = json_err.into();
    assert!(matches!(err, ReportError::Serialize(_)));
    assert!(err.to_string().starts_with("Report serialization failed"));
}
