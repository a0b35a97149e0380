//! Host reflection capability.
//!
//! The engine never touches a live object directly. Everything it learns
//! about a node goes through `Reflectable`, and everything it learns about
//! the host environment goes through `Runtime`. Any host with a reflection
//! facility can implement these two traits.

pub mod snapshot;

use std::fmt;
use std::path::PathBuf;

use modscout_core::errors::HostResult;
use modscout_core::types::NodeId;
use serde::{Deserialize, Serialize};

pub use snapshot::{
    ComputedAttr, ObjectRecord, SnapshotBuilder, SnapshotFile, SnapshotGraph, SnapshotNode,
};

/// Coarse structural kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Module,
    /// A type/class object.
    Type,
    /// A function, method or other plain invokable.
    Callable,
    /// Any other object.
    Instance,
    /// Scalar, text or bytes value. Never traversed.
    Primitive,
}

impl NodeKind {
    pub fn is_module(self) -> bool {
        self == Self::Module
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module => write!(f, "module"),
            Self::Type => write!(f, "type"),
            Self::Callable => write!(f, "callable"),
            Self::Instance => write!(f, "instance"),
            Self::Primitive => write!(f, "primitive"),
        }
    }
}

/// Result of an attribute fetch.
///
/// `Unavailable` is the absent-marker: the attribute is missing, could not
/// be read, or would need a computed lookup that is not permitted. It is
/// distinct from `Found` of a host value that happens to represent null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<N> {
    Found(N),
    Unavailable,
}

impl<N> Lookup<N> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn found(self) -> Option<N> {
        match self {
            Self::Found(node) => Some(node),
            Self::Unavailable => None,
        }
    }
}

/// Reflection over a single live node.
///
/// Metadata reads return `Ok(None)` when the node simply lacks the field
/// and `Err` when reading it failed; callers degrade both to null.
pub trait Reflectable: Clone {
    /// Identity token. Equal ids mean the same live object.
    fn node_id(&self) -> NodeId;

    fn kind(&self) -> NodeKind;

    /// Whether the node can be invoked (functions, types, callable instances).
    fn is_callable(&self) -> bool;

    /// Whether the node carries its own attribute table.
    fn has_attribute_table(&self) -> bool;

    /// Name of the node's runtime type.
    fn type_name(&self) -> HostResult<String>;

    /// Declared name (`module.name` for modules).
    fn name(&self) -> HostResult<Option<String>>;

    /// Name of the module the node declares as its owner.
    fn owner_module(&self) -> HostResult<Option<String>>;

    fn qualified_name(&self) -> HostResult<Option<String>>;

    /// File a module was loaded from.
    fn module_file(&self) -> HostResult<Option<String>>;

    /// Loader origin of a module: a path, or the built-in marker.
    fn spec_origin(&self) -> HostResult<Option<String>>;

    /// Keys of the node's own attribute table, in host order.
    fn declared_attributes(&self) -> HostResult<Vec<String>>;

    /// Names surfaced by the general enumeration protocol. May include
    /// inherited or computed names.
    fn enumerated_attributes(&self) -> HostResult<Vec<String>>;

    /// Read `name` from the attribute table only. Free of side effects.
    fn get_declared(&self, name: &str) -> HostResult<Option<Self>>;

    /// Full attribute lookup. May run host code (properties, descriptors,
    /// lazy imports).
    fn get_computed(&self, name: &str) -> HostResult<Option<Self>>;
}

/// The host environment a scan runs against.
pub trait Runtime {
    type Node: Reflectable;

    /// Load or look up a root by importable name.
    fn resolve_root(&self, name: &str) -> HostResult<Self::Node>;

    /// Whether `name` is in the interpreter's built-in module registry.
    fn is_builtin_module_name(&self, name: &str) -> bool;

    /// The standard-library directory, if the host knows it.
    fn stdlib_dir(&self) -> Option<PathBuf>;
}
