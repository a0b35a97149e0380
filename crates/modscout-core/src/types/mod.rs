//! Identity and collection types shared across modscout crates.

pub mod collections;
pub mod identifiers;

pub use collections::{FxHashMap, FxHashSet, PathSegments};
pub use identifiers::NodeId;
