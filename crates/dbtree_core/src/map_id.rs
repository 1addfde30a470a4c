use crate::entity::{ClusterId, ConnectType, Entity, GroupingMode, TenantId};
use std::fmt;

pub const LOGICAL_DATA_SOURCE_LABEL: &str = "Logical Database";
pub const UNGROUPED_LABEL: &str = "Ungrouped";

/// Identifies one group (or data-source subgroup) within a grouping mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapId {
    Project(i64),
    DataSource(i64),
    /// Bucket for logical databases, which have no physical data source.
    LogicalDataSource,
    Environment(i64),
    ConnectType(ConnectType),
    Cluster(String),
    Tenant {
        cluster: String,
        tenant: String,
    },
    /// Cluster or tenant bucket for data sources that carry neither.
    Ungrouped,
}

// Reserved spellings; ids are numeric, so these never collide with them.
const LOGICAL_SEGMENT: &str = "logical";
const UNGROUPED_SEGMENT: &str = "ungrouped";

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapId::Project(id) | MapId::DataSource(id) | MapId::Environment(id) => {
                write!(f, "{}", id)
            }
            MapId::LogicalDataSource => f.write_str(LOGICAL_SEGMENT),
            MapId::ConnectType(connect_type) => f.write_str(connect_type.as_str()),
            MapId::Cluster(name) => f.write_str(name),
            MapId::Tenant { cluster, tenant } => write!(f, "{}:{}", cluster, tenant),
            MapId::Ungrouped => f.write_str(UNGROUPED_SEGMENT),
        }
    }
}

/// A group's identity plus its display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupId {
    pub map_id: MapId,
    pub group_name: String,
}

impl GroupId {
    fn new(map_id: MapId, group_name: impl Into<String>) -> Self {
        Self {
            map_id,
            group_name: group_name.into(),
        }
    }

    fn ungrouped() -> Self {
        Self::new(MapId::Ungrouped, UNGROUPED_LABEL)
    }
}

/// Derives the group an entity falls into under `mode`.
///
/// Returns `None` when the entity lacks the attribute the mode groups by, in
/// which case the entity is left out of that mode. Cluster and tenant always
/// resolve, using the `Ungrouped` bucket as fallback. `GroupingMode::None` has
/// no groups at all.
pub fn derive_map_id(entity: &Entity, mode: GroupingMode) -> Option<GroupId> {
    match mode {
        GroupingMode::None => None,

        GroupingMode::Project => entity
            .project
            .as_ref()
            .map(|project| GroupId::new(MapId::Project(project.id), project.name.clone())),

        GroupingMode::DataSource => {
            if entity.is_logical() {
                return Some(GroupId::new(
                    MapId::LogicalDataSource,
                    LOGICAL_DATA_SOURCE_LABEL,
                ));
            }
            entity
                .data_source
                .as_ref()
                .map(|ds| GroupId::new(MapId::DataSource(ds.id), ds.name.clone()))
        }

        GroupingMode::Environment => entity
            .environment
            .as_ref()
            .map(|env| GroupId::new(MapId::Environment(env.id), env.name.clone())),

        GroupingMode::ConnectType => entity.connect_type().map(|connect_type| {
            GroupId::new(MapId::ConnectType(connect_type), connect_type.label())
        }),

        GroupingMode::Cluster => Some(match entity.cluster() {
            ClusterId::Named(name) => GroupId::new(MapId::Cluster(name.clone()), name),
            ClusterId::Ungrouped => GroupId::ungrouped(),
        }),

        GroupingMode::Tenant => Some(match entity.tenant() {
            TenantId::Named { cluster, tenant } => {
                let label = tenant.clone();
                GroupId::new(MapId::Tenant { cluster, tenant }, label)
            }
            TenantId::Ungrouped => GroupId::ungrouped(),
        }),
    }
}
