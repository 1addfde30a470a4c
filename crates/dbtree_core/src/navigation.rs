use crate::entity::{Entity, EntityId, GroupingMode};
use crate::map_id::{MapId, derive_map_id};
use crate::node_key::{NodeKey, NodeType, ObjectCategory, SubFolder};
use crate::tree_state::TreeState;
use serde::Serialize;

/// An object inside a database that the tree should reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectTarget {
    Table { name: String },
    Column { table: String, column: String },
    ExternalTable { name: String },
    View { name: String },
    MaterializedView { name: String },
    Function { name: String },
    Procedure { name: String },
    Package { name: String },
    Trigger { name: String },
    Type { name: String },
    Sequence { name: String },
    Synonym { name: String, public: bool },
}

impl ObjectTarget {
    pub fn category(&self) -> ObjectCategory {
        match self {
            ObjectTarget::Table { .. } | ObjectTarget::Column { .. } => ObjectCategory::Table,
            ObjectTarget::ExternalTable { .. } => ObjectCategory::ExternalTable,
            ObjectTarget::View { .. } => ObjectCategory::View,
            ObjectTarget::MaterializedView { .. } => ObjectCategory::MaterializedView,
            ObjectTarget::Function { .. } => ObjectCategory::Function,
            ObjectTarget::Procedure { .. } => ObjectCategory::Procedure,
            ObjectTarget::Package { .. } => ObjectCategory::Package,
            ObjectTarget::Trigger { .. } => ObjectCategory::Trigger,
            ObjectTarget::Type { .. } => ObjectCategory::Type,
            ObjectTarget::Sequence { .. } => ObjectCategory::Sequence,
            ObjectTarget::Synonym { public: false, .. } => ObjectCategory::Synonym,
            ObjectTarget::Synonym { public: true, .. } => ObjectCategory::PublicSynonym,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectReference {
    pub entity_id: EntityId,
    pub object: ObjectTarget,
}

/// Pages that belong to a data source rather than to a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    SessionManagement,
    RecycleBin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDescriptor {
    pub kind: PageKind,
    pub data_source_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    Entity { entity_id: EntityId },
    Object(ObjectReference),
    Page(PageDescriptor),
}

/// Keys to expand, outermost first, to reveal a target node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpansionPath {
    pub path: Vec<NodeKey>,
    pub terminal_key: Option<NodeKey>,
    pub terminal_node_type: Option<NodeType>,
}

impl ExpansionPath {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    fn ending_at(path: Vec<NodeKey>, terminal: NodeKey) -> Self {
        let terminal_node_type = Some(terminal.kind());
        Self {
            path,
            terminal_key: Some(terminal),
            terminal_node_type,
        }
    }
}

/// Computes the keys that must be expanded to reveal `target` under the
/// active grouping mode.
///
/// An unknown database, or one the active mode does not list, yields an empty
/// path. Object keys use the versions currently recorded in `state`.
pub fn resolve_expansion_path(
    target: &NavigationTarget,
    active_mode: GroupingMode,
    all_entities: &[Entity],
    state: &TreeState,
) -> ExpansionPath {
    let entity_id = match target {
        NavigationTarget::Page(page) => return resolve_page(page),
        NavigationTarget::Entity { entity_id } => *entity_id,
        NavigationTarget::Object(reference) => reference.entity_id,
    };

    let Some(entity) = all_entities.iter().find(|e| e.id == entity_id) else {
        log::debug!("Navigation target database {} not found", entity_id);
        return ExpansionPath::empty();
    };

    let Some(mut path) = group_prefix(entity, active_mode) else {
        log::debug!(
            "Database {} is not listed when grouping by {}",
            entity_id,
            active_mode
        );
        return ExpansionPath::empty();
    };

    let database = NodeKey::database(entity);
    path.push(database.clone());

    let resolved = match target {
        NavigationTarget::Object(reference) => {
            let tail = object_tail(entity, &reference.object, state);
            let terminal = tail.last().cloned().unwrap_or(database);
            path.extend(tail);
            ExpansionPath::ending_at(path, terminal)
        }
        _ => ExpansionPath::ending_at(path, database),
    };

    if matches!(
        active_mode,
        GroupingMode::Project | GroupingMode::DataSource | GroupingMode::Tenant
    ) {
        return without_second_group(resolved);
    }
    resolved
}

/// Group and data-source subgroup keys leading to a database.
///
/// Always emits the subgroup key; single-tier modes strip it afterwards.
/// `None` means the mode does not list this database.
fn group_prefix(entity: &Entity, mode: GroupingMode) -> Option<Vec<NodeKey>> {
    if mode == GroupingMode::None {
        return Some(Vec::new());
    }

    let group = derive_map_id(entity, mode)?;
    let mut prefix = vec![NodeKey::group(mode, &group.map_id)];

    if let Some(data_source) = derive_map_id(entity, GroupingMode::DataSource) {
        prefix.push(NodeKey::second_group(
            mode,
            &group.map_id,
            &data_source.map_id,
        ));
    }

    Some(prefix)
}

fn without_second_group(mut resolved: ExpansionPath) -> ExpansionPath {
    resolved.path.retain(|key| !key.is_second_group());
    resolved
}

/// Keys below the database node, ending with the target itself.
fn object_tail(entity: &Entity, object: &ObjectTarget, state: &TreeState) -> Vec<NodeKey> {
    let category = object.category();
    let version = state.versions(entity.id).get(category);
    let root = NodeKey::category_root(entity, category);

    match object {
        // Overloaded names make individual subprogram keys unreliable; stop at
        // the category root.
        ObjectTarget::Function { .. } | ObjectTarget::Procedure { .. } => vec![root],

        ObjectTarget::Column { table, column } => {
            let table = NodeKey::object(entity, category, version, table);
            let mut tail = vec![root, table.clone()];
            if let Some(columns) = table.sub_root(SubFolder::Column)
                && let Some(column) = columns.sub_object(column)
            {
                tail.push(columns);
                tail.push(column);
            }
            tail
        }

        ObjectTarget::Table { name }
        | ObjectTarget::ExternalTable { name }
        | ObjectTarget::View { name }
        | ObjectTarget::MaterializedView { name }
        | ObjectTarget::Package { name }
        | ObjectTarget::Trigger { name }
        | ObjectTarget::Type { name }
        | ObjectTarget::Sequence { name }
        | ObjectTarget::Synonym { name, .. } => {
            vec![root, NodeKey::object(entity, category, version, name)]
        }
    }
}

/// Data-source pages only need their group scrolled into view, nothing expanded.
fn resolve_page(page: &PageDescriptor) -> ExpansionPath {
    let Some(data_source_id) = page.data_source_id else {
        log::debug!("{:?} page has no data source to locate", page.kind);
        return ExpansionPath::empty();
    };

    let group = NodeKey::group(GroupingMode::DataSource, &MapId::DataSource(data_source_id));
    ExpansionPath::ending_at(vec![NodeKey::placeholder()], group)
}
