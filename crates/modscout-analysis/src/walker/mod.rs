//! Graph Walker Module
//!
//! Bounded breadth-first traversal from named roots. Every node identity
//! is visited at most once per scan and the visited count never exceeds
//! the object budget, so cyclic graphs terminate.

mod engine;
mod types;

pub use engine::GraphWalker;
pub use types::*;
