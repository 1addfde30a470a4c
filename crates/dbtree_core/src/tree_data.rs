use crate::entity::{Entity, GroupingMode};
use crate::grouping::{GroupedEntities, MemberList};
use crate::node_key::{NodeKey, NodeType};
use serde::Serialize;

/// A rendered resource-tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub key: NodeKey,
    pub title: String,
    pub node_type: NodeType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn new(key: NodeKey, title: impl Into<String>) -> Self {
        let node_type = key.kind();
        Self {
            key,
            title: title.into(),
            node_type,
            children: Vec::new(),
        }
    }

    fn children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    /// Depth-first search for a node by key.
    pub fn find(&self, key: &NodeKey) -> Option<&TreeNode> {
        if &self.key == key {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(key))
    }
}

/// Root level of the resource tree for the active grouping mode.
///
/// Uses the same group and subgroup keys the navigator emits, so every
/// resolved path points at nodes that exist here.
pub fn build_root_nodes(grouped: &GroupedEntities, mode: GroupingMode) -> Vec<TreeNode> {
    if let Some(groups) = grouped.flat_groups(mode) {
        return groups
            .values()
            .map(|group| {
                TreeNode::new(NodeKey::group(mode, &group.map_id), group.name.clone())
                    .children(database_nodes(&group.entities))
            })
            .collect();
    }

    if let Some(groups) = grouped.nested_groups(mode) {
        return groups
            .values()
            .map(|group| {
                let mut children: Vec<TreeNode> = group
                    .subgroups
                    .values()
                    .map(|sub| {
                        TreeNode::new(
                            NodeKey::second_group(mode, &group.map_id, &sub.map_id),
                            sub.name.clone(),
                        )
                        .children(database_nodes(&sub.entities))
                    })
                    .collect();

                // Physical databases without a data source sit directly under
                // the group.
                children.extend(
                    group
                        .entities
                        .iter()
                        .filter(|entity| {
                            !group
                                .subgroups
                                .values()
                                .any(|sub| sub.entities.contains(entity.id))
                        })
                        .map(database_node),
                );

                TreeNode::new(NodeKey::group(mode, &group.map_id), group.name.clone())
                    .children(children)
            })
            .collect();
    }

    let mut all = MemberList::new();
    for entity in grouped.all.values() {
        all.insert(entity.clone());
    }
    database_nodes(&all)
}

fn database_nodes(entities: &MemberList) -> Vec<TreeNode> {
    entities.iter().map(database_node).collect()
}

fn database_node(entity: &Entity) -> TreeNode {
    TreeNode::new(NodeKey::database(entity), entity.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ConnectType, DataSource};
    use crate::grouping::classify_all;

    fn entity(id: i64, ds: &DataSource) -> Entity {
        let mut entity = Entity::physical(id, format!("db{id}"));
        entity.data_source = Some(ds.clone());
        entity
    }

    #[test]
    fn test_none_mode_lists_databases_logical_first() {
        let grouped = classify_all(&[Entity::physical(1, "a"), Entity::logical(2, "b")], &[]);
        let nodes = build_root_nodes(&grouped, GroupingMode::None);

        let titles: Vec<_> = nodes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a"]);
        assert!(nodes.iter().all(|n| n.node_type == NodeType::Database));
    }

    #[test]
    fn test_data_source_mode_includes_empty_groups() {
        let used = DataSource::new(1, "used");
        let idle = DataSource::new(2, "idle");
        let grouped = classify_all(&[entity(10, &used)], &[used.clone(), idle]);

        let nodes = build_root_nodes(&grouped, GroupingMode::DataSource);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].children.len(), 1);
        assert!(nodes[1].children.is_empty());
        assert_eq!(nodes[1].key.to_string(), "Group-dataSource-2");
    }

    #[test]
    fn test_nested_mode_has_second_tier() {
        let ds = DataSource {
            connect_type: Some(ConnectType::Oracle),
            ..DataSource::new(4, "ora")
        };
        let grouped = classify_all(&[entity(10, &ds)], &[]);

        let nodes = build_root_nodes(&grouped, GroupingMode::ConnectType);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].title, "Oracle");

        let second = &nodes[0].children[0];
        assert_eq!(second.node_type, NodeType::SecondGroup);
        assert_eq!(second.children[0].key.to_string(), "10");
    }

    #[test]
    fn test_nested_mode_lists_databases_without_data_source_under_group() {
        let ds = DataSource::new(4, "primary");
        let grouped = classify_all(&[entity(10, &ds), Entity::physical(5, "bare")], &[]);

        let nodes = build_root_nodes(&grouped, GroupingMode::Cluster);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].key.to_string(), "Group-cluster-ungrouped");

        let kinds: Vec<_> = nodes[0]
            .children
            .iter()
            .map(|n| (n.key.to_string(), n.node_type))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("SecondGroup-cluster-ungrouped-4".to_string(), NodeType::SecondGroup),
                ("5".to_string(), NodeType::Database),
            ]
        );
    }

    #[test]
    fn test_serializes_keys_as_strings() {
        let grouped = classify_all(&[Entity::physical(1, "a")], &[]);
        let nodes = build_root_nodes(&grouped, GroupingMode::None);

        let json = serde_json::to_value(&nodes).unwrap();
        assert_eq!(json[0]["key"], "1");
        assert_eq!(json[0]["nodeType"], "Database");
        assert!(json[0].get("children").is_none());
    }
}
