use dbtree_core::{
    ConnectType, ExpansionPath, GroupingMode, NavigationTarget, NodeKey, NodeType,
    ObjectReference, ObjectTarget, TreeState, build_root_nodes, classify_all,
    resolve_expansion_path,
};
use dbtree_test_support::fixtures::{EntityBuilder, environment, mixed_fleet};

fn column_target(entity_id: i64) -> NavigationTarget {
    NavigationTarget::Object(ObjectReference {
        entity_id,
        object: ObjectTarget::Column {
            table: "orders".into(),
            column: "id".into(),
        },
    })
}

fn rendered(resolved: &ExpansionPath) -> Vec<String> {
    resolved.path.iter().map(NodeKey::to_string).collect()
}

#[test]
fn table_column_path_without_grouping() {
    let sales = EntityBuilder::physical(1, "sales").build();

    let resolved = resolve_expansion_path(
        &column_target(1),
        GroupingMode::None,
        &[sales],
        &TreeState::new(),
    );

    assert_eq!(
        rendered(&resolved),
        vec![
            "1",
            "1-sales-table",
            "1-sales-table-orders",
            "1-sales-table-orders-column",
            "1-sales-table-orders-column-id",
        ]
    );
    assert_eq!(
        resolved.terminal_key.map(|k| k.to_string()),
        Some("1-sales-table-orders-column-id".to_string())
    );
    assert_eq!(resolved.terminal_node_type, Some(NodeType::TableColumn));
}

#[test]
fn project_mode_paths_never_contain_second_group_keys() {
    let (entities, _) = mixed_fleet();

    for entity in &entities {
        for target in [
            NavigationTarget::Entity {
                entity_id: entity.id,
            },
            column_target(entity.id),
        ] {
            let resolved = resolve_expansion_path(
                &target,
                GroupingMode::Project,
                &entities,
                &TreeState::new(),
            );
            assert!(
                rendered(&resolved)
                    .iter()
                    .all(|key| !key.starts_with("SecondGroup")),
                "{:?}",
                rendered(&resolved)
            );
        }
    }
}

#[test]
fn unknown_target_resolves_to_nothing() {
    let (entities, _) = mixed_fleet();

    for mode in GroupingMode::ALL {
        let resolved = resolve_expansion_path(
            &column_target(404),
            *mode,
            &entities,
            &TreeState::new(),
        );
        assert!(resolved.path.is_empty());
        assert!(resolved.terminal_key.is_none());
        assert!(resolved.terminal_node_type.is_none());
    }
}

#[test]
fn resolved_group_keys_exist_in_the_rendered_tree() {
    let (mut entities, data_sources) = mixed_fleet();
    // Physical database registered without a data source.
    entities.push(
        EntityBuilder::physical(40, "orphan")
            .environment(environment(2, "dev"))
            .connect_type(ConnectType::Mysql)
            .build(),
    );
    let grouped = classify_all(&entities, &data_sources);

    for mode in GroupingMode::ALL {
        let roots = build_root_nodes(&grouped, *mode);

        for entity in &entities {
            let resolved = resolve_expansion_path(
                &NavigationTarget::Entity {
                    entity_id: entity.id,
                },
                *mode,
                &entities,
                &TreeState::new(),
            );

            if resolved.is_empty() {
                assert!(
                    !grouped.member_ids(*mode).contains(&entity.id),
                    "{} should be reachable in {mode}",
                    entity.id
                );
                continue;
            }

            // Each key must be a child of the previous one.
            let mut level = &roots;
            for key in &resolved.path {
                let node = level
                    .iter()
                    .find(|node| &node.key == key)
                    .unwrap_or_else(|| panic!("{key} missing in {mode} tree"));
                level = &node.children;
            }
        }
    }
}

#[test]
fn logical_database_in_cluster_mode_goes_through_logical_subgroup() {
    let (entities, _) = mixed_fleet();

    let resolved = resolve_expansion_path(
        &NavigationTarget::Entity { entity_id: 12 },
        GroupingMode::Cluster,
        &entities,
        &TreeState::new(),
    );

    assert_eq!(
        rendered(&resolved),
        vec![
            "Group-cluster-ungrouped",
            "SecondGroup-cluster-ungrouped-logical",
            "12"
        ]
    );
}

#[test]
fn refreshed_category_changes_object_keys() {
    let (entities, _) = mixed_fleet();
    let mut state = TreeState::new();
    let target = column_target(10);

    let before = resolve_expansion_path(&target, GroupingMode::None, &entities, &state);
    state.refresh_category(10, dbtree_core::ObjectCategory::Table);
    let after = resolve_expansion_path(&target, GroupingMode::None, &entities, &state);

    assert_eq!(before.path[..2], after.path[..2]);
    assert_ne!(before.path[2], after.path[2]);
    assert_eq!(after.path[2].to_string(), "10-1-ledger-table-orders");
}

#[test]
fn database_without_data_source_is_reachable_in_every_nested_mode() {
    let bare = EntityBuilder::physical(5, "bare")
        .environment(environment(2, "dev"))
        .connect_type(ConnectType::Oracle)
        .build();
    let entities = vec![bare];
    let grouped = classify_all(&entities, &[]);

    for mode in [
        GroupingMode::Environment,
        GroupingMode::ConnectType,
        GroupingMode::Cluster,
    ] {
        let resolved = resolve_expansion_path(
            &NavigationTarget::Entity { entity_id: 5 },
            mode,
            &entities,
            &TreeState::new(),
        );
        assert_eq!(resolved.path.len(), 2, "mode {mode}");

        let roots = build_root_nodes(&grouped, mode);
        let group = roots
            .iter()
            .find(|node| node.key == resolved.path[0])
            .unwrap_or_else(|| panic!("group missing in {mode} tree"));
        assert!(
            group.children.iter().any(|node| node.key == resolved.path[1]),
            "database missing under {} in {mode} tree",
            group.key
        );
    }
}
