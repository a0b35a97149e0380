//! JSON snapshot host.
//!
//! A snapshot is a dump of an object graph written by an exporter running
//! inside the audited program. It records, per object, the declared
//! attribute table separately from computed attributes so the engine's
//! safe/risk distinction carries over. Computed reads are counted, which
//! makes the side effects of risk mode observable.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use modscout_core::errors::{HostError, HostResult};
use modscout_core::types::{FxHashMap, FxHashSet, NodeId};
use serde::{Deserialize, Serialize};

use super::{NodeKind, Reflectable, Runtime};

/// Result of a computed attribute read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputedAttr {
    /// The lookup yields the object with this id.
    Value(u64),
    /// The lookup raises with this message.
    Error(String),
}

/// One object in the dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectRecord {
    pub id: u64,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualname: Option<String>,
    pub callable: bool,
    /// Defaults to true for every kind except primitives.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_dict: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec_origin: Option<String>,
    /// Declared attribute table: name → object id.
    pub attributes: BTreeMap<String, u64>,
    /// Attributes only reachable through a full lookup.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub computed: BTreeMap<String, ComputedAttr>,
    /// Further names reported by enumeration with no recorded value.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_names: Vec<String>,
    /// Metadata fields whose read fails.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub broken_metadata: Vec<String>,
}

impl Default for ObjectRecord {
    fn default() -> Self {
        Self {
            id: 0,
            kind: NodeKind::Instance,
            type_name: None,
            name: None,
            owner_module: None,
            qualname: None,
            callable: false,
            has_dict: None,
            module_file: None,
            spec_origin: None,
            attributes: BTreeMap::new(),
            computed: BTreeMap::new(),
            extra_names: Vec::new(),
            broken_metadata: Vec::new(),
        }
    }
}

impl ObjectRecord {
    fn metadata(&self, field: &str, value: &Option<String>) -> HostResult<Option<String>> {
        if self.broken_metadata.iter().any(|f| f == field) {
            return Err(HostError::MetadataUnavailable {
                field: field.to_string(),
            });
        }
        Ok(value.clone())
    }
}

/// On-disk snapshot format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotFile {
    pub builtin_module_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdlib_dir: Option<PathBuf>,
    /// Importable name → module object id.
    pub modules: BTreeMap<String, u64>,
    pub objects: Vec<ObjectRecord>,
}

struct GraphInner {
    objects: FxHashMap<u64, ObjectRecord>,
    modules: BTreeMap<String, u64>,
    builtin_names: FxHashSet<String>,
    stdlib_dir: Option<PathBuf>,
    computed_lookups: Cell<u64>,
}

/// A loaded snapshot. Implements `Runtime`.
#[derive(Clone)]
pub struct SnapshotGraph {
    inner: Rc<GraphInner>,
}

impl SnapshotGraph {
    pub fn from_file_model(file: SnapshotFile) -> Self {
        let objects = file.objects.into_iter().map(|o| (o.id, o)).collect();
        Self {
            inner: Rc::new(GraphInner {
                objects,
                modules: file.modules,
                builtin_names: file.builtin_module_names.into_iter().collect(),
                stdlib_dir: file.stdlib_dir,
                computed_lookups: Cell::new(0),
            }),
        }
    }

    pub fn from_json(json: &str) -> HostResult<Self> {
        let file: SnapshotFile =
            serde_json::from_str(json).map_err(|e| HostError::SnapshotLoad {
                path: "<string>".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self::from_file_model(file))
    }

    /// Load a snapshot dump from disk.
    pub fn load(path: &Path) -> HostResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| HostError::SnapshotLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let file: SnapshotFile =
            serde_json::from_str(&content).map_err(|e| HostError::SnapshotLoad {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(Self::from_file_model(file))
    }

    /// Handle for the object with this id, if present.
    pub fn node(&self, id: u64) -> Option<SnapshotNode> {
        self.inner.objects.contains_key(&id).then(|| SnapshotNode {
            graph: Rc::clone(&self.inner),
            id,
        })
    }

    /// Number of computed lookups performed so far.
    pub fn computed_lookups(&self) -> u64 {
        self.inner.computed_lookups.get()
    }

    pub fn object_count(&self) -> usize {
        self.inner.objects.len()
    }
}

impl fmt::Debug for SnapshotGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotGraph")
            .field("objects", &self.inner.objects.len())
            .field("modules", &self.inner.modules.len())
            .finish()
    }
}

impl Runtime for SnapshotGraph {
    type Node = SnapshotNode;

    fn resolve_root(&self, name: &str) -> HostResult<SnapshotNode> {
        let id = self
            .inner
            .modules
            .get(name)
            .ok_or_else(|| HostError::RootNotFound {
                name: name.to_string(),
            })?;
        self.node(*id)
            .ok_or(HostError::DanglingReference { id: *id })
    }

    fn is_builtin_module_name(&self, name: &str) -> bool {
        self.inner.builtin_names.contains(name)
    }

    fn stdlib_dir(&self) -> Option<PathBuf> {
        self.inner.stdlib_dir.clone()
    }
}

/// Handle to one object of a `SnapshotGraph`.
#[derive(Clone)]
pub struct SnapshotNode {
    graph: Rc<GraphInner>,
    id: u64,
}

impl SnapshotNode {
    fn record(&self) -> &ObjectRecord {
        // Handles are only created for ids present in the map.
        &self.graph.objects[&self.id]
    }

    fn handle(&self, id: u64) -> HostResult<SnapshotNode> {
        if self.graph.objects.contains_key(&id) {
            Ok(SnapshotNode {
                graph: Rc::clone(&self.graph),
                id,
            })
        } else {
            Err(HostError::DanglingReference { id })
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl fmt::Debug for SnapshotNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.record();
        f.debug_struct("SnapshotNode")
            .field("id", &self.id)
            .field("kind", &record.kind)
            .field("name", &record.name)
            .finish()
    }
}

impl Reflectable for SnapshotNode {
    fn node_id(&self) -> NodeId {
        NodeId::from(self.id)
    }

    fn kind(&self) -> NodeKind {
        self.record().kind
    }

    fn is_callable(&self) -> bool {
        let record = self.record();
        record.callable || matches!(record.kind, NodeKind::Callable | NodeKind::Type)
    }

    fn has_attribute_table(&self) -> bool {
        let record = self.record();
        record
            .has_dict
            .unwrap_or(record.kind != NodeKind::Primitive)
    }

    fn type_name(&self) -> HostResult<String> {
        let record = self.record();
        let name = record.metadata("type_name", &record.type_name)?;
        Ok(name.unwrap_or_else(|| record.kind.to_string()))
    }

    fn name(&self) -> HostResult<Option<String>> {
        let record = self.record();
        record.metadata("name", &record.name)
    }

    fn owner_module(&self) -> HostResult<Option<String>> {
        let record = self.record();
        record.metadata("owner_module", &record.owner_module)
    }

    fn qualified_name(&self) -> HostResult<Option<String>> {
        let record = self.record();
        record.metadata("qualname", &record.qualname)
    }

    fn module_file(&self) -> HostResult<Option<String>> {
        let record = self.record();
        record.metadata("module_file", &record.module_file)
    }

    fn spec_origin(&self) -> HostResult<Option<String>> {
        let record = self.record();
        record.metadata("spec_origin", &record.spec_origin)
    }

    fn declared_attributes(&self) -> HostResult<Vec<String>> {
        let record = self.record();
        if record.broken_metadata.iter().any(|f| f == "attributes") {
            return Err(HostError::MetadataUnavailable {
                field: "attributes".to_string(),
            });
        }
        Ok(record.attributes.keys().cloned().collect())
    }

    fn enumerated_attributes(&self) -> HostResult<Vec<String>> {
        let record = self.record();
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let names = record
            .attributes
            .keys()
            .chain(record.computed.keys())
            .chain(record.extra_names.iter())
            .filter(|n| seen.insert(n.as_str()))
            .cloned()
            .collect();
        Ok(names)
    }

    fn get_declared(&self, name: &str) -> HostResult<Option<SnapshotNode>> {
        match self.record().attributes.get(name) {
            Some(&id) => self.handle(id).map(Some),
            None => Ok(None),
        }
    }

    fn get_computed(&self, name: &str) -> HostResult<Option<SnapshotNode>> {
        let counter = &self.graph.computed_lookups;
        counter.set(counter.get() + 1);

        let record = self.record();
        match record.computed.get(name) {
            Some(ComputedAttr::Value(id)) => self.handle(*id).map(Some),
            Some(ComputedAttr::Error(message)) => Err(HostError::AttributeError {
                name: name.to_string(),
                message: message.clone(),
            }),
            None => match record.attributes.get(name) {
                Some(&id) => self.handle(id).map(Some),
                None => Ok(None),
            },
        }
    }
}

/// Builds a snapshot in memory.
#[derive(Debug)]
pub struct SnapshotBuilder {
    file: SnapshotFile,
    next_id: u64,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self {
            file: SnapshotFile::default(),
            next_id: 1,
        }
    }

    /// Add a record, assigning a fresh id. Returns the id.
    pub fn add(&mut self, mut record: ObjectRecord) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        record.id = id;
        self.file.objects.push(record);
        id
    }

    /// Add an importable module loaded from no particular location.
    pub fn module(&mut self, name: &str) -> u64 {
        let id = self.add(ObjectRecord {
            kind: NodeKind::Module,
            type_name: Some("module".to_string()),
            name: Some(name.to_string()),
            ..Default::default()
        });
        self.file.modules.insert(name.to_string(), id);
        id
    }

    /// Add an importable module with a loader origin (path or built-in marker).
    pub fn module_with_origin(&mut self, name: &str, origin: &str) -> u64 {
        let id = self.module(name);
        if let Some(record) = self.record_mut(id) {
            record.spec_origin = Some(origin.to_string());
            if origin != modscout_core::constants::BUILTIN_ORIGIN {
                record.module_file = Some(origin.to_string());
            }
        }
        id
    }

    pub fn class(&mut self, name: &str, owner_module: &str) -> u64 {
        self.add(ObjectRecord {
            kind: NodeKind::Type,
            type_name: Some("type".to_string()),
            name: Some(name.to_string()),
            qualname: Some(name.to_string()),
            owner_module: Some(owner_module.to_string()),
            callable: true,
            ..Default::default()
        })
    }

    pub fn function(&mut self, name: &str, owner_module: &str) -> u64 {
        self.add(ObjectRecord {
            kind: NodeKind::Callable,
            type_name: Some("function".to_string()),
            name: Some(name.to_string()),
            qualname: Some(name.to_string()),
            owner_module: Some(owner_module.to_string()),
            callable: true,
            ..Default::default()
        })
    }

    pub fn instance(&mut self, type_name: &str) -> u64 {
        self.add(ObjectRecord {
            kind: NodeKind::Instance,
            type_name: Some(type_name.to_string()),
            ..Default::default()
        })
    }

    pub fn primitive(&mut self, type_name: &str) -> u64 {
        self.add(ObjectRecord {
            kind: NodeKind::Primitive,
            type_name: Some(type_name.to_string()),
            ..Default::default()
        })
    }

    /// Bind `name` in `owner`'s declared attribute table.
    pub fn set_attr(&mut self, owner: u64, name: &str, target: u64) -> &mut Self {
        if let Some(record) = self.record_mut(owner) {
            record.attributes.insert(name.to_string(), target);
        }
        self
    }

    /// Make `name` reachable on `owner` only through a computed lookup.
    pub fn set_computed(&mut self, owner: u64, name: &str, target: u64) -> &mut Self {
        if let Some(record) = self.record_mut(owner) {
            record
                .computed
                .insert(name.to_string(), ComputedAttr::Value(target));
        }
        self
    }

    /// Make a computed lookup of `name` on `owner` raise.
    pub fn set_computed_error(&mut self, owner: u64, name: &str, message: &str) -> &mut Self {
        if let Some(record) = self.record_mut(owner) {
            record
                .computed
                .insert(name.to_string(), ComputedAttr::Error(message.to_string()));
        }
        self
    }

    pub fn add_extra_name(&mut self, owner: u64, name: &str) -> &mut Self {
        if let Some(record) = self.record_mut(owner) {
            record.extra_names.push(name.to_string());
        }
        self
    }

    /// Make reads of a metadata field on `owner` fail.
    pub fn break_metadata(&mut self, owner: u64, field: &str) -> &mut Self {
        if let Some(record) = self.record_mut(owner) {
            record.broken_metadata.push(field.to_string());
        }
        self
    }

    pub fn builtin_name(&mut self, name: &str) -> &mut Self {
        self.file.builtin_module_names.push(name.to_string());
        self
    }

    pub fn stdlib_dir(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.file.stdlib_dir = Some(dir.into());
        self
    }

    pub fn record_mut(&mut self, id: u64) -> Option<&mut ObjectRecord> {
        self.file.objects.iter_mut().find(|o| o.id == id)
    }

    /// The snapshot in its on-disk form.
    pub fn to_file_model(&self) -> SnapshotFile {
        self.file.clone()
    }

    pub fn build(self) -> SnapshotGraph {
        SnapshotGraph::from_file_model(self.file)
    }
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}
