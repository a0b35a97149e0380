//! JSON report assembly.

use std::path::Path;

use chrono::{DateTime, Utc};
use modscout_core::config::{ModscoutConfig, RuleSpec, ScanConfig};
use modscout_core::errors::ReportError;
use serde::Serialize;
use tracing::info;

use super::summary::Summary;
use crate::walker::Finding;

/// Top-level report record. Borrows the findings it writes.
#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    pub generated_at: DateTime<Utc>,
    pub roots: &'a [String],
    pub rules: &'a [RuleSpec],
    pub scan: &'a ScanConfig,
    pub summary: Summary,
    /// Findings before the output limit was applied.
    pub total_matches: usize,
    pub findings: &'a [Finding],
}

impl<'a> Report<'a> {
    /// Assemble a report, keeping the first `output.limit` findings
    /// (all of them when the limit is absent or 0).
    pub fn build(config: &'a ModscoutConfig, findings: &'a [Finding]) -> Self {
        let written = match config.output.effective_limit() {
            Some(limit) => &findings[..limit.min(findings.len())],
            None => findings,
        };
        Self {
            generated_at: Utc::now(),
            roots: &config.roots,
            rules: &config.rules,
            scan: &config.scan,
            summary: Summary::from_findings(findings),
            total_matches: findings.len(),
            findings: written,
        }
    }

    /// Number of findings that will be written.
    pub fn written(&self) -> usize {
        self.findings.len()
    }

    pub fn to_json_pretty(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty-printed UTF-8 JSON.
    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        let json = self.to_json_pretty()?;
        std::fs::write(path, json).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            path = %path.display(),
            written = self.written(),
            total = self.total_matches,
            "report written"
        );
        Ok(())
    }
}
