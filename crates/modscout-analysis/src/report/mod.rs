//! Report assembly - summary counts, the JSON report and console output.

pub mod assembler;
pub mod console;
pub mod summary;

pub use assembler::Report;
pub use console::{render, render_findings, render_summary};
pub use summary::Summary;
