//! Rule engine output types.

use modscout_core::config::RuleSpec;
use serde::{Deserialize, Serialize};

/// One rule that matched one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleHit {
    /// The rule's `type` tag.
    pub kind: String,
    /// Human-readable match reason; the key used by summaries.
    pub reason: String,
    /// The rule as configured.
    pub rule: RuleSpec,
}
