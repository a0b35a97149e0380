//! Console rendering of a finished scan.

use std::fmt::Write;

use modscout_core::constants::CONSOLE_PREVIEW_LIMIT;

use super::summary::Summary;
use crate::walker::Finding;

/// Summary block followed by the first findings.
pub fn render(roots: &[String], summary: &Summary, findings: &[Finding]) -> String {
    let mut out = render_summary(roots, summary);
    out.push('\n');
    out.push_str(&render_findings(findings, CONSOLE_PREVIEW_LIMIT));
    out
}

pub fn render_summary(roots: &[String], summary: &Summary) -> String {
    let mut out = String::from("=== Summary ===\n");
    let _ = writeln!(out, "Roots: {}", roots.join(", "));
    for (reason, count) in summary.ordered() {
        let _ = writeln!(out, "{count:5}  {reason}");
    }
    out
}

/// `[d=<depth>] <path> :: <type> (<location>)  -- <reason>` per finding,
/// at most `limit` of them.
pub fn render_findings(findings: &[Finding], limit: usize) -> String {
    let shown = &findings[..limit.min(findings.len())];
    let mut out = format!("=== First {} findings ===\n", shown.len());
    for finding in shown {
        let object = &finding.object;
        let _ = writeln!(
            out,
            "[d={}] {} :: {} ({})  -- {}",
            finding.depth,
            finding.path,
            object.type_name.as_deref().unwrap_or("None"),
            object.location().as_deref().unwrap_or("None"),
            finding.hit.reason,
        );
    }
    out
}
