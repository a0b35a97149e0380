//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;

/// Discovery path segments. Paths rarely exceed the default depth budget.
pub type PathSegments = SmallVec<[String; 8]>;
