//! Node identity tokens.
//!
//! Cycle detection keys on identity, never on structural equality: two
//! equal-looking objects with different identities are distinct nodes,
//! and the same identity reached twice is one node.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identity of a live object, as assigned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for NodeId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}
