use async_trait::async_trait;
use dbtree_core::{ExpansionPath, NodeKey, NodeType, TreeController, TreeNode};

pub fn print_tree(nodes: &[TreeNode]) {
    for line in tree_lines(nodes) {
        println!("{}", line);
    }
}

pub fn print_path(resolved: &ExpansionPath) {
    for (step, key) in resolved.path.iter().enumerate() {
        println!("{:>3}. {}", step + 1, key);
    }

    if let (Some(key), Some(node_type)) = (&resolved.terminal_key, resolved.terminal_node_type) {
        println!("  -> {} ({:?})", key, node_type);
    }
}

fn tree_lines(nodes: &[TreeNode]) -> Vec<String> {
    let mut lines = Vec::new();
    for node in nodes {
        push_node(node, 0, &mut lines);
    }
    lines
}

fn push_node(node: &TreeNode, depth: usize, lines: &mut Vec<String>) {
    let suffix = if node.node_type == NodeType::Database {
        String::new()
    } else {
        format!(" ({})", node.children.len())
    };
    lines.push(format!(
        "{}{}{}  [{}]",
        "  ".repeat(depth),
        node.title,
        suffix,
        node.key
    ));

    for child in &node.children {
        push_node(child, depth + 1, lines);
    }
}

/// Reports navigator steps on stdout as they happen.
pub struct PrintingController;

#[async_trait]
impl TreeController for PrintingController {
    async fn expand(&self, key: &NodeKey) {
        println!("expand {}", key);
    }

    async fn scroll_into_view(&self, key: &NodeKey, node_type: NodeType) {
        println!("scroll {} ({:?})", key, node_type);
    }
}
