//! Report output configuration.

use serde::{Deserialize, Serialize};

/// Where and how much of the findings list is written.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// JSON report path. No report is written when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_path: Option<String>,
    /// Maximum findings written to the report. 0 = unlimited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl OutputConfig {
    /// Returns the findings cap, or `None` when unlimited (absent or 0).
    pub fn effective_limit(&self) -> Option<usize> {
        self.limit.filter(|&limit| limit > 0)
    }
}
