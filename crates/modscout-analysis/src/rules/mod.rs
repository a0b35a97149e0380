//! Rule engine - classifies each visited node against the configured rules.
//!
//! Rules are independent: every rule is evaluated for every node, and a
//! node may produce several hits. Category rules resolve through an
//! injected `CategoryRegistry`.

pub mod categories;
pub mod engine;
pub mod types;

pub use categories::{CategoryMatcher, CategoryRegistry};
pub use engine::RuleEngine;
pub use types::RuleHit;
