//! Safe accessor - attribute retrieval under a configurable risk policy.
//!
//! The declared attribute table is read first; it is nearly free of side
//! effects. Only in risk mode does a miss fall through to the full lookup
//! protocol, which may execute properties, descriptors or lazy imports on
//! the host. Risk mode is opt-in and a host that blocks or loops inside a
//! computed attribute will stall the scan.

use tracing::trace;

use crate::host::{Lookup, Reflectable};

/// Fetches attributes from nodes, isolating every read failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SafeAccessor {
    risk: bool,
}

impl SafeAccessor {
    /// Declared-table-only accessor.
    pub fn new() -> Self {
        Self { risk: false }
    }

    /// Accessor that falls back to computed lookups.
    pub fn with_risk(risk: bool) -> Self {
        Self { risk }
    }

    pub fn is_risk_mode(&self) -> bool {
        self.risk
    }

    /// Fetch `name` from `node`.
    pub fn get<N: Reflectable>(&self, node: &N, name: &str) -> Lookup<N> {
        match node.get_declared(name) {
            Ok(Some(value)) => return Lookup::Found(value),
            Ok(None) => {}
            Err(e) => trace!(attr = name, error = %e, "declared read failed"),
        }

        if !self.risk {
            return Lookup::Unavailable;
        }

        match node.get_computed(name) {
            Ok(Some(value)) => Lookup::Found(value),
            Ok(None) => Lookup::Unavailable,
            Err(e) => {
                trace!(attr = name, error = %e, "computed lookup failed");
                Lookup::Unavailable
            }
        }
    }
}
