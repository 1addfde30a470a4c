use crate::entity::{DataSource, Entity, EntityId, GroupingMode};
use crate::map_id::{GroupId, MapId, derive_map_id};
use indexmap::IndexMap;
use std::collections::{HashSet, VecDeque};

/// Ordered databases of one group. Logical databases always come first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberList {
    entities: VecDeque<Entity>,
}

impl MemberList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logical databases go to the front, physical ones to the back.
    pub fn insert(&mut self, entity: Entity) {
        if entity.is_logical() {
            self.entities.push_front(entity);
        } else {
            self.entities.push_back(entity);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, entity_id: EntityId) -> bool {
        self.entities.iter().any(|e| e.id == entity_id)
    }
}

/// Group of a single-tier mode (`project`, `dataSource`, `tenant`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatGroup {
    pub map_id: MapId,
    pub name: String,
    pub entities: MemberList,
}

impl FlatGroup {
    fn new(group: GroupId) -> Self {
        Self {
            map_id: group.map_id,
            name: group.group_name,
            entities: MemberList::new(),
        }
    }
}

/// Data-source tier beneath a nested group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subgroup {
    pub map_id: MapId,
    pub name: String,
    pub entities: MemberList,
}

/// Group of a two-tier mode (`environment`, `connectType`, `cluster`).
///
/// `entities` lists every member of the group; `subgroups` splits the same
/// members by data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedGroup {
    pub map_id: MapId,
    pub name: String,
    pub entities: MemberList,
    pub subgroups: IndexMap<MapId, Subgroup>,
}

impl NestedGroup {
    fn new(group: GroupId) -> Self {
        Self {
            map_id: group.map_id,
            name: group.group_name,
            entities: MemberList::new(),
            subgroups: IndexMap::new(),
        }
    }
}

/// The seven grouping views of one entity list.
#[derive(Debug, Clone, Default)]
pub struct GroupedEntities {
    /// Ungrouped view, keyed by entity id in input order.
    pub all: IndexMap<EntityId, Entity>,
    pub project: IndexMap<MapId, FlatGroup>,
    pub data_source: IndexMap<MapId, FlatGroup>,
    pub tenant: IndexMap<MapId, FlatGroup>,
    pub environment: IndexMap<MapId, NestedGroup>,
    pub connect_type: IndexMap<MapId, NestedGroup>,
    pub cluster: IndexMap<MapId, NestedGroup>,

    /// Distinct data sources referenced by physical databases, first seen first.
    pub data_sources: Vec<DataSource>,
}

impl GroupedEntities {
    pub fn flat_groups(&self, mode: GroupingMode) -> Option<&IndexMap<MapId, FlatGroup>> {
        match mode {
            GroupingMode::Project => Some(&self.project),
            GroupingMode::DataSource => Some(&self.data_source),
            GroupingMode::Tenant => Some(&self.tenant),
            _ => None,
        }
    }

    pub fn nested_groups(&self, mode: GroupingMode) -> Option<&IndexMap<MapId, NestedGroup>> {
        match mode {
            GroupingMode::Environment => Some(&self.environment),
            GroupingMode::ConnectType => Some(&self.connect_type),
            GroupingMode::Cluster => Some(&self.cluster),
            _ => None,
        }
    }

    /// Ids of every entity placed somewhere in `mode`'s grouping.
    pub fn member_ids(&self, mode: GroupingMode) -> HashSet<EntityId> {
        if mode == GroupingMode::None {
            return self.all.keys().copied().collect();
        }
        if let Some(groups) = self.flat_groups(mode) {
            return groups.values().flat_map(|g| g.entities.ids()).collect();
        }
        self.nested_groups(mode)
            .map(|groups| groups.values().flat_map(|g| g.entities.ids()).collect())
            .unwrap_or_default()
    }
}

/// Partitions `entities` into every grouping mode at once.
///
/// `filter` is applied first and the surviving set feeds all modes. Every data
/// source in `data_sources` gets a (possibly empty) group in the data-source
/// view; all other groups appear as their first member is seen.
pub fn classify<F>(entities: &[Entity], data_sources: &[DataSource], filter: F) -> GroupedEntities
where
    F: Fn(&Entity) -> bool,
{
    let mut grouped = GroupedEntities::default();

    for ds in data_sources {
        grouped.data_source.insert(
            MapId::DataSource(ds.id),
            FlatGroup {
                map_id: MapId::DataSource(ds.id),
                name: ds.name.clone(),
                entities: MemberList::new(),
            },
        );
    }

    let mut seen_data_sources = HashSet::new();

    for entity in entities.iter().filter(|e| filter(*e)) {
        grouped.all.insert(entity.id, entity.clone());

        if !entity.is_logical()
            && let Some(ds) = &entity.data_source
            && seen_data_sources.insert(ds.id)
        {
            grouped.data_sources.push(ds.clone());
        }

        insert_flat(&mut grouped.project, entity, GroupingMode::Project);
        insert_flat(&mut grouped.data_source, entity, GroupingMode::DataSource);
        insert_flat(&mut grouped.tenant, entity, GroupingMode::Tenant);
        insert_nested(&mut grouped.environment, entity, GroupingMode::Environment);
        insert_nested(&mut grouped.connect_type, entity, GroupingMode::ConnectType);
        insert_nested(&mut grouped.cluster, entity, GroupingMode::Cluster);
    }

    grouped
}

pub fn classify_all(entities: &[Entity], data_sources: &[DataSource]) -> GroupedEntities {
    classify(entities, data_sources, |_| true)
}

fn insert_flat(groups: &mut IndexMap<MapId, FlatGroup>, entity: &Entity, mode: GroupingMode) {
    let Some(group) = derive_map_id(entity, mode) else {
        return;
    };

    groups
        .entry(group.map_id.clone())
        .or_insert_with(|| FlatGroup::new(group))
        .entities
        .insert(entity.clone());
}

fn insert_nested(groups: &mut IndexMap<MapId, NestedGroup>, entity: &Entity, mode: GroupingMode) {
    let Some(group) = derive_map_id(entity, mode) else {
        return;
    };

    let nested = groups
        .entry(group.map_id.clone())
        .or_insert_with(|| NestedGroup::new(group));
    nested.entities.insert(entity.clone());

    if let Some(second) = derive_map_id(entity, GroupingMode::DataSource) {
        nested
            .subgroups
            .entry(second.map_id.clone())
            .or_insert_with(|| Subgroup {
                map_id: second.map_id,
                name: second.group_name,
                entities: MemberList::new(),
            })
            .entities
            .insert(entity.clone());
    }
}
