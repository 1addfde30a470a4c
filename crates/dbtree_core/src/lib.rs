mod config;
mod entity;
mod error;
mod filter;
mod grouping;
mod map_id;
mod navigation;
mod navigator;
mod node_key;
mod snapshot;
mod tree_data;
mod tree_state;

pub use config::{NavigationDelays, TreeConfig, TreeConfigStore};
pub use entity::{
    ClusterId, ConnectType, DataSource, Dialect, Entity, EntityId, EntityKind, EnvironmentRef,
    GroupingMode, ProjectRef, TenantId,
};
pub use error::TreeError;
pub use filter::EntityFilter;
pub use grouping::{
    FlatGroup, GroupedEntities, MemberList, NestedGroup, Subgroup, classify, classify_all,
};
pub use map_id::{GroupId, LOGICAL_DATA_SOURCE_LABEL, MapId, UNGROUPED_LABEL, derive_map_id};
pub use navigation::{
    ExpansionPath, NavigationTarget, ObjectReference, ObjectTarget, PageDescriptor, PageKind,
    resolve_expansion_path,
};
pub use navigator::{
    DriverState, ExpansionDriver, NavigationId, Navigator, TreeController, step_delay,
};
pub use node_key::{
    KEY_SEPARATOR, NodeKey, NodeType, ObjectCategory, ObjectNode, ObjectVersions, PackagePart,
    SubFolder, database_children, object_nodes,
};
pub use snapshot::Snapshot;
pub use tree_data::{TreeNode, build_root_nodes};
pub use tree_state::TreeState;
