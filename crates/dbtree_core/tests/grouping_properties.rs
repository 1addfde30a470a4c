use dbtree_core::{
    Entity, EntityFilter, FlatGroup, GroupedEntities, GroupingMode, MapId, MemberList,
    NestedGroup, NodeKey, ObjectCategory, classify, classify_all,
};
use dbtree_test_support::fixtures::{EntityBuilder, data_source, mixed_fleet};

fn member_lists(grouped: &GroupedEntities) -> Vec<&MemberList> {
    let mut lists: Vec<&MemberList> = Vec::new();
    for groups in [&grouped.project, &grouped.data_source, &grouped.tenant] {
        lists.extend(groups.values().map(|g| &g.entities));
    }
    for groups in [&grouped.environment, &grouped.connect_type, &grouped.cluster] {
        for group in groups.values() {
            lists.push(&group.entities);
            lists.extend(group.subgroups.values().map(|s| &s.entities));
        }
    }
    lists
}

fn flat_layout<'a>(groups: impl Iterator<Item = &'a FlatGroup>) -> Vec<(MapId, Vec<i64>)> {
    groups
        .map(|g| (g.map_id.clone(), g.entities.ids()))
        .collect()
}

fn nested_layout<'a>(
    groups: impl Iterator<Item = &'a NestedGroup>,
) -> Vec<(MapId, Vec<i64>, Vec<(MapId, Vec<i64>)>)> {
    groups
        .map(|g| {
            let subgroups = g
                .subgroups
                .values()
                .map(|s| (s.map_id.clone(), s.entities.ids()))
                .collect();
            (g.map_id.clone(), g.entities.ids(), subgroups)
        })
        .collect()
}

fn assert_logical_first(list: &MemberList) {
    let kinds: Vec<bool> = list.iter().map(Entity::is_logical).collect();
    let first_physical = kinds.iter().position(|logical| !logical);
    if let Some(first_physical) = first_physical {
        assert!(
            kinds[first_physical..].iter().all(|logical| !logical),
            "logical database after physical one in {:?}",
            list.ids()
        );
    }
}

#[test]
fn logical_databases_lead_every_member_list_in_any_input_order() {
    let (entities, data_sources) = mixed_fleet();

    let mut orderings = Vec::new();
    for shift in 0..entities.len() {
        let mut rotated = entities.clone();
        rotated.rotate_left(shift);
        orderings.push(rotated.clone());
        rotated.reverse();
        orderings.push(rotated);
    }

    for ordering in orderings {
        let grouped = classify_all(&ordering, &data_sources);
        for list in member_lists(&grouped) {
            assert_logical_first(list);
        }
    }
}

#[test]
fn omitting_an_entity_from_one_mode_leaves_other_modes_unchanged() {
    let (entities, data_sources) = mixed_fleet();
    let baseline = classify_all(&entities, &data_sources);

    let mut stripped = entities.clone();
    stripped[0].environment = None;
    stripped[3].project = None;
    let changed = classify_all(&stripped, &data_sources);

    assert!(!changed.member_ids(GroupingMode::Environment).contains(&10));
    assert!(!changed.member_ids(GroupingMode::Project).contains(&20));

    assert_eq!(
        flat_layout(baseline.data_source.values()),
        flat_layout(changed.data_source.values())
    );
    assert_eq!(
        flat_layout(baseline.tenant.values()),
        flat_layout(changed.tenant.values())
    );
    assert_eq!(
        nested_layout(baseline.connect_type.values()),
        nested_layout(changed.connect_type.values())
    );
    assert_eq!(
        nested_layout(baseline.cluster.values()),
        nested_layout(changed.cluster.values())
    );
    assert_eq!(
        baseline.member_ids(GroupingMode::None),
        changed.member_ids(GroupingMode::None)
    );
}

#[test]
fn single_pass_matches_per_mode_passes() {
    let (entities, data_sources) = mixed_fleet();
    let together = classify_all(&entities, &data_sources);

    for mode in GroupingMode::ALL {
        let mut one_by_one = std::collections::HashSet::new();
        for entity in &entities {
            let alone = classify_all(std::slice::from_ref(entity), &[]);
            one_by_one.extend(alone.member_ids(*mode));
        }
        assert_eq!(together.member_ids(*mode), one_by_one, "mode {mode}");
    }
}

#[test]
fn every_known_data_source_has_a_group() {
    let (entities, data_sources) = mixed_fleet();
    let grouped = classify_all(&entities, &data_sources);

    for ds in &data_sources {
        assert!(grouped.data_source.contains_key(&MapId::DataSource(ds.id)));
    }
    assert!(grouped.data_source[&MapId::DataSource(3)].entities.is_empty());

    let first_keys: Vec<_> = grouped.data_source.keys().take(3).cloned().collect();
    assert_eq!(
        first_keys,
        vec![
            MapId::DataSource(1),
            MapId::DataSource(2),
            MapId::DataSource(3)
        ]
    );
    assert_eq!(
        grouped.data_source[&MapId::LogicalDataSource].entities.ids(),
        vec![21, 12]
    );
}

#[test]
fn referenced_data_sources_are_distinct_and_ordered() {
    let (entities, data_sources) = mixed_fleet();
    let grouped = classify_all(&entities, &data_sources);

    let ids: Vec<_> = grouped.data_sources.iter().map(|ds| ds.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn logical_only_data_source_reference_is_not_listed() {
    let ds = data_source(5, "shadow");
    let entities = vec![EntityBuilder::logical(1, "lg").data_source(&ds).build()];

    let grouped = classify_all(&entities, &[]);
    assert!(grouped.data_sources.is_empty());
}

#[test]
fn filter_bar_narrows_all_modes_together() {
    let (entities, data_sources) = mixed_fleet();
    let filter = EntityFilter::new().with_environments([1]);

    let grouped = classify(&entities, &data_sources, |e| filter.matches(e));

    for mode in GroupingMode::ALL {
        let ids = grouped.member_ids(*mode);
        assert!(!ids.contains(&20), "mode {mode}");
        assert!(!ids.contains(&30), "mode {mode}");
    }
    assert_eq!(grouped.all.len(), 3);
    // Pre-seeded groups survive filtering.
    assert_eq!(grouped.data_source.len(), 4);
}

#[test]
fn node_keys_are_stable_within_a_version_and_change_after() {
    let entity = Entity::physical(1, "sales");

    for version in [None, Some(1), Some(41)] {
        let a = NodeKey::object(&entity, ObjectCategory::Sequence, version, "seq_id");
        let b = NodeKey::object(&entity, ObjectCategory::Sequence, version, "seq_id");
        assert_eq!(a.to_string(), b.to_string());

        let bumped = version.map_or(1, |v| v + 1);
        let c = NodeKey::object(&entity, ObjectCategory::Sequence, Some(bumped), "seq_id");
        assert_ne!(a.to_string(), c.to_string());
    }
}
