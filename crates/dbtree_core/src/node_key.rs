use crate::entity::{Dialect, Entity, GroupingMode};
use crate::map_id::MapId;
use serde::{Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Separator used when a key is rendered to a string.
pub const KEY_SEPARATOR: &str = "-";

const GROUP_PREFIX: &str = "Group";
const SECOND_GROUP_PREFIX: &str = "SecondGroup";
const PLACEHOLDER_PREFIX: &str = "Placeholder";

/// Every kind of node the resource tree can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeType {
    Group,
    SecondGroup,
    Placeholder,
    Database,

    TableRoot,
    Table,
    TableColumnRoot,
    TableColumn,
    TableIndexRoot,
    TableIndex,
    TablePartitionRoot,
    TablePartition,
    TableConstraintRoot,
    TableConstraint,

    ExternalTableRoot,
    ExternalTable,
    ExternalTableColumnRoot,
    ExternalTableColumn,

    ViewRoot,
    View,
    ViewColumnRoot,
    ViewColumn,

    MaterializedViewRoot,
    MaterializedView,
    MaterializedViewColumnRoot,
    MaterializedViewColumn,
    MaterializedViewIndexRoot,
    MaterializedViewIndex,

    FunctionRoot,
    Function,
    ProcedureRoot,
    Procedure,

    PackageRoot,
    Package,
    PackageHead,
    PackageBody,
    PackageProgram,

    TriggerRoot,
    Trigger,
    TypeRoot,
    Type,
    SequenceRoot,
    Sequence,
    SynonymRoot,
    Synonym,
    PublicSynonymRoot,
    PublicSynonym,
}

impl NodeType {
    /// Group-level nodes exist purely in the UI and need no data load.
    pub fn is_group(self) -> bool {
        matches!(self, NodeType::Group | NodeType::SecondGroup)
    }

    /// The child node type listed beneath a sub-folder root.
    fn leaf_of(self) -> Option<NodeType> {
        Some(match self {
            NodeType::TableColumnRoot => NodeType::TableColumn,
            NodeType::TableIndexRoot => NodeType::TableIndex,
            NodeType::TablePartitionRoot => NodeType::TablePartition,
            NodeType::TableConstraintRoot => NodeType::TableConstraint,
            NodeType::ExternalTableColumnRoot => NodeType::ExternalTableColumn,
            NodeType::ViewColumnRoot => NodeType::ViewColumn,
            NodeType::MaterializedViewColumnRoot => NodeType::MaterializedViewColumn,
            NodeType::MaterializedViewIndexRoot => NodeType::MaterializedViewIndex,
            _ => return None,
        })
    }
}

/// A top-level object category listed under a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectCategory {
    Table,
    ExternalTable,
    View,
    MaterializedView,
    Function,
    Procedure,
    Package,
    Trigger,
    Type,
    Sequence,
    Synonym,
    PublicSynonym,
}

impl ObjectCategory {
    pub fn literal(self) -> &'static str {
        match self {
            ObjectCategory::Table => "table",
            ObjectCategory::ExternalTable => "externalTable",
            ObjectCategory::View => "view",
            ObjectCategory::MaterializedView => "materializedView",
            ObjectCategory::Function => "function",
            ObjectCategory::Procedure => "procedure",
            ObjectCategory::Package => "package",
            ObjectCategory::Trigger => "trigger",
            ObjectCategory::Type => "type",
            ObjectCategory::Sequence => "sequence",
            ObjectCategory::Synonym => "synonym",
            ObjectCategory::PublicSynonym => "publicSynonym",
        }
    }

    pub fn root_type(self) -> NodeType {
        match self {
            ObjectCategory::Table => NodeType::TableRoot,
            ObjectCategory::ExternalTable => NodeType::ExternalTableRoot,
            ObjectCategory::View => NodeType::ViewRoot,
            ObjectCategory::MaterializedView => NodeType::MaterializedViewRoot,
            ObjectCategory::Function => NodeType::FunctionRoot,
            ObjectCategory::Procedure => NodeType::ProcedureRoot,
            ObjectCategory::Package => NodeType::PackageRoot,
            ObjectCategory::Trigger => NodeType::TriggerRoot,
            ObjectCategory::Type => NodeType::TypeRoot,
            ObjectCategory::Sequence => NodeType::SequenceRoot,
            ObjectCategory::Synonym => NodeType::SynonymRoot,
            ObjectCategory::PublicSynonym => NodeType::PublicSynonymRoot,
        }
    }

    pub fn object_type(self) -> NodeType {
        match self {
            ObjectCategory::Table => NodeType::Table,
            ObjectCategory::ExternalTable => NodeType::ExternalTable,
            ObjectCategory::View => NodeType::View,
            ObjectCategory::MaterializedView => NodeType::MaterializedView,
            ObjectCategory::Function => NodeType::Function,
            ObjectCategory::Procedure => NodeType::Procedure,
            ObjectCategory::Package => NodeType::Package,
            ObjectCategory::Trigger => NodeType::Trigger,
            ObjectCategory::Type => NodeType::Type,
            ObjectCategory::Sequence => NodeType::Sequence,
            ObjectCategory::Synonym => NodeType::Synonym,
            ObjectCategory::PublicSynonym => NodeType::PublicSynonym,
        }
    }

    /// Subprograms may be overloaded, so their keys use list position.
    pub fn keyed_by_index(self) -> bool {
        matches!(self, ObjectCategory::Function | ObjectCategory::Procedure)
    }
}

impl Dialect {
    /// Category roots shown beneath a database of this dialect, in display order.
    pub fn object_categories(self) -> &'static [ObjectCategory] {
        match self {
            Dialect::MySql => &[
                ObjectCategory::Table,
                ObjectCategory::ExternalTable,
                ObjectCategory::View,
                ObjectCategory::MaterializedView,
                ObjectCategory::Function,
                ObjectCategory::Procedure,
            ],
            Dialect::Oracle => &[
                ObjectCategory::Table,
                ObjectCategory::ExternalTable,
                ObjectCategory::View,
                ObjectCategory::MaterializedView,
                ObjectCategory::Function,
                ObjectCategory::Procedure,
                ObjectCategory::Package,
                ObjectCategory::Trigger,
                ObjectCategory::Type,
                ObjectCategory::Sequence,
                ObjectCategory::Synonym,
                ObjectCategory::PublicSynonym,
            ],
            Dialect::Other => &[ObjectCategory::Table, ObjectCategory::View],
        }
    }
}

/// Detail folders shown beneath a table-like object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubFolder {
    Column,
    Index,
    Partition,
    Constraint,
}

impl SubFolder {
    pub fn literal(self) -> &'static str {
        match self {
            SubFolder::Column => "column",
            SubFolder::Index => "index",
            SubFolder::Partition => "partition",
            SubFolder::Constraint => "constraint",
        }
    }

    fn root_type_under(self, parent: NodeType) -> Option<NodeType> {
        Some(match (parent, self) {
            (NodeType::Table, SubFolder::Column) => NodeType::TableColumnRoot,
            (NodeType::Table, SubFolder::Index) => NodeType::TableIndexRoot,
            (NodeType::Table, SubFolder::Partition) => NodeType::TablePartitionRoot,
            (NodeType::Table, SubFolder::Constraint) => NodeType::TableConstraintRoot,
            (NodeType::ExternalTable, SubFolder::Column) => NodeType::ExternalTableColumnRoot,
            (NodeType::View, SubFolder::Column) => NodeType::ViewColumnRoot,
            (NodeType::MaterializedView, SubFolder::Column) => {
                NodeType::MaterializedViewColumnRoot
            }
            (NodeType::MaterializedView, SubFolder::Index) => NodeType::MaterializedViewIndexRoot,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackagePart {
    Head,
    Body,
}

impl PackagePart {
    pub fn literal(self) -> &'static str {
        match self {
            PackagePart::Head => "head",
            PackagePart::Body => "body",
        }
    }
}

/// Per-category reload counters for one database.
///
/// Counters are embedded in object keys so that reloading a category gives
/// every object under it a fresh identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectVersions {
    counters: HashMap<ObjectCategory, u64>,
}

impl ObjectVersions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: ObjectCategory) -> Option<u64> {
        self.counters.get(&category).copied()
    }

    pub fn set(&mut self, category: ObjectCategory, version: u64) {
        self.counters.insert(category, version);
    }

    /// Increments the counter for `category`, starting at 1, and returns it.
    pub fn bump(&mut self, category: ObjectCategory) -> u64 {
        let counter = self.counters.entry(category).or_insert(0);
        *counter += 1;
        *counter
    }
}

/// Typed identity of a tree node.
///
/// The key is kept as its node type plus the ordered segments it is built
/// from. It is joined into a string only when handed to the renderer, and is
/// never parsed back.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeKey {
    kind: NodeType,
    parts: Vec<String>,
}

impl NodeKey {
    pub fn kind(&self) -> NodeType {
        self.kind
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn is_group(&self) -> bool {
        self.kind.is_group()
    }

    pub fn is_second_group(&self) -> bool {
        self.kind == NodeType::SecondGroup
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind == NodeType::Placeholder
    }

    pub fn database(entity: &Entity) -> Self {
        Self {
            kind: NodeType::Database,
            parts: vec![entity.id.to_string()],
        }
    }

    pub fn group(mode: GroupingMode, map_id: &MapId) -> Self {
        Self {
            kind: NodeType::Group,
            parts: vec![
                GROUP_PREFIX.to_string(),
                mode.to_string(),
                map_id.to_string(),
            ],
        }
    }

    pub fn second_group(mode: GroupingMode, map_id: &MapId, data_source: &MapId) -> Self {
        Self {
            kind: NodeType::SecondGroup,
            parts: vec![
                SECOND_GROUP_PREFIX.to_string(),
                mode.to_string(),
                map_id.to_string(),
                data_source.to_string(),
            ],
        }
    }

    /// Leading entry of a path that positions without expanding anything.
    pub fn placeholder() -> Self {
        Self {
            kind: NodeType::Placeholder,
            parts: vec![PLACEHOLDER_PREFIX.to_string()],
        }
    }

    pub fn category_root(entity: &Entity, category: ObjectCategory) -> Self {
        Self {
            kind: category.root_type(),
            parts: vec![
                entity.id.to_string(),
                entity.name.clone(),
                category.literal().to_string(),
            ],
        }
    }

    /// Key of a named object, e.g. `1-3-sales-table-orders`.
    ///
    /// The version segment is present only once the category has been loaded.
    pub fn object(
        entity: &Entity,
        category: ObjectCategory,
        version: Option<u64>,
        name: &str,
    ) -> Self {
        Self::object_with_segment(entity, category, version, name.to_string())
    }

    /// Key of a positionally identified object (functions and procedures).
    pub fn indexed_object(
        entity: &Entity,
        category: ObjectCategory,
        version: Option<u64>,
        index: usize,
    ) -> Self {
        Self::object_with_segment(entity, category, version, index.to_string())
    }

    fn object_with_segment(
        entity: &Entity,
        category: ObjectCategory,
        version: Option<u64>,
        segment: String,
    ) -> Self {
        let mut parts = Vec::with_capacity(5);
        parts.push(entity.id.to_string());
        if let Some(version) = version {
            parts.push(version.to_string());
        }
        parts.push(entity.name.clone());
        parts.push(category.literal().to_string());
        parts.push(segment);

        Self {
            kind: category.object_type(),
            parts,
        }
    }

    fn extend(&self, kind: NodeType, segments: &[&str]) -> Self {
        let mut parts = self.parts.clone();
        parts.extend(segments.iter().map(|s| s.to_string()));
        Self { kind, parts }
    }

    /// Detail folder beneath a table-like object. `None` if the object has no
    /// such folder.
    pub fn sub_root(&self, folder: SubFolder) -> Option<Self> {
        let kind = folder.root_type_under(self.kind)?;
        Some(self.extend(kind, &[folder.literal()]))
    }

    /// Item beneath a detail folder, e.g. a column under the columns folder.
    pub fn sub_object(&self, name: &str) -> Option<Self> {
        let kind = self.kind.leaf_of()?;
        Some(self.extend(kind, &[name]))
    }

    pub fn package_part(&self, part: PackagePart) -> Option<Self> {
        if self.kind != NodeType::Package {
            return None;
        }
        let kind = match part {
            PackagePart::Head => NodeType::PackageHead,
            PackagePart::Body => NodeType::PackageBody,
        };
        Some(self.extend(kind, &[part.literal()]))
    }

    /// Subprogram inside a package head or body, keyed by position.
    pub fn package_program(&self, category: ObjectCategory, index: usize) -> Option<Self> {
        if !matches!(self.kind, NodeType::PackageHead | NodeType::PackageBody)
            || !category.keyed_by_index()
        {
            return None;
        }
        let index = index.to_string();
        Some(self.extend(NodeType::PackageProgram, &[category.literal(), index.as_str()]))
    }
}

/// Joins the parts with [`KEY_SEPARATOR`].
///
/// Names are not escaped, so an object name containing `-` can render the
/// same string as a different key (table `a-column` vs the column folder of
/// table `a`). Compare `NodeKey` values, not rendered strings.
impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts.join(KEY_SEPARATOR))
    }
}

impl Serialize for NodeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A loaded object paired with its tree key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectNode {
    pub name: String,
    pub key: NodeKey,
}

/// Builds keys for a freshly loaded list of objects in one category.
///
/// A sibling that repeats an earlier name would collide with it, so it is
/// dropped and logged; the first occurrence wins. Positionally keyed
/// categories never collide.
pub fn object_nodes<S: AsRef<str>>(
    entity: &Entity,
    category: ObjectCategory,
    names: &[S],
    versions: &ObjectVersions,
) -> Vec<ObjectNode> {
    let version = versions.get(category);

    if category.keyed_by_index() {
        return names
            .iter()
            .enumerate()
            .map(|(index, name)| ObjectNode {
                name: name.as_ref().to_string(),
                key: NodeKey::indexed_object(entity, category, version, index),
            })
            .collect();
    }

    let mut seen = HashSet::new();
    let mut nodes = Vec::with_capacity(names.len());

    for name in names {
        let name = name.as_ref();
        if name.contains(KEY_SEPARATOR) {
            log::warn!(
                "{} '{}' in database {} contains '{}'; its rendered key may be ambiguous",
                category.literal(),
                name,
                entity.id,
                KEY_SEPARATOR
            );
        }
        if !seen.insert(name) {
            log::warn!(
                "Dropping duplicate {} '{}' in database {} ({})",
                category.literal(),
                name,
                entity.name,
                entity.id
            );
            continue;
        }
        nodes.push(ObjectNode {
            name: name.to_string(),
            key: NodeKey::object(entity, category, version, name),
        });
    }

    nodes
}

/// Category roots shown when a database node is expanded.
pub fn database_children(entity: &Entity) -> Vec<NodeKey> {
    let dialect = entity
        .connect_type()
        .map(|connect_type| connect_type.dialect())
        .unwrap_or(Dialect::Other);

    dialect
        .object_categories()
        .iter()
        .map(|category| NodeKey::category_root(entity, *category))
        .collect()
}
