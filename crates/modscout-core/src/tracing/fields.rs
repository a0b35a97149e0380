//! Structured span field names.
//!
//! Every scan span records these fields so log queries can aggregate
//! runs without parsing messages.

/// Walker: distinct objects marked visited.
pub const OBJECTS_VISITED: &str = "objects_visited";

/// Walker: findings recorded.
pub const FINDINGS: &str = "findings";

/// Walker: roots that resolved to a node.
pub const ROOTS_RESOLVED: &str = "roots_resolved";

/// Walker: wall-clock scan duration in milliseconds.
pub const SCAN_DURATION_MS: &str = "scan_duration_ms";
