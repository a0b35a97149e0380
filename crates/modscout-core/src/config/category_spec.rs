//! Category override tables.

use serde::{Deserialize, Serialize};

/// Module and callable names making up one risk category.
///
/// A non-empty spec replaces the engine's built-in table for that name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorySpec {
    pub modules: Vec<String>,
    pub callables: Vec<String>,
}

impl CategorySpec {
    pub fn new<M, C>(modules: M, callables: C) -> Self
    where
        M: IntoIterator,
        M::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            modules: modules.into_iter().map(Into::into).collect(),
            callables: callables.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.callables.is_empty()
    }
}
