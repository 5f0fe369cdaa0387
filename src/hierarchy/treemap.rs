//! Treemap tree built from a cluster index.

use core::fmt;

use serde::Serialize;

use super::ClusterIndex;
use crate::report::Cluster;

/// Label of the synthetic root when the report has no level-0 cluster.
pub const ROOT_LABEL: &str = "All opinions";

/// A node of the treemap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapNode {
    /// Cluster id (empty for the synthetic root).
    pub id: String,
    /// Display label.
    pub label: String,
    /// Description text.
    pub takeaway: String,
    /// Hierarchy level (0 for the root).
    pub level: u32,
    /// Area weight: member argument count.
    pub value: u64,
    /// Child nodes in source order.
    pub children: Vec<TreemapNode>,
}

impl TreemapNode {
    fn from_cluster(cluster: &Cluster) -> Self {
        Self {
            id: cluster.id.clone(),
            label: cluster.label.clone(),
            takeaway: cluster.takeaway.clone(),
            level: cluster.level,
            value: cluster.value,
            children: Vec::new(),
        }
    }

    /// Whether the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including itself.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Leaf nodes in depth-first order.
    pub fn leaves(&self) -> Vec<&TreemapNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.is_leaf() {
                out.push(node);
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    /// Find a node by cluster id.
    pub fn find(&self, id: &str) -> Option<&TreemapNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }
}

impl fmt::Display for TreemapNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node[{}] L{} ({}): {}", self.id, self.level, self.value, self.label)
    }
}

/// Build the treemap for the indexed clusters.
///
/// A single level-0 cluster becomes the root. Otherwise a synthetic root
/// labelled [`ROOT_LABEL`] gathers every top-level cluster and its value is
/// their sum.
///
/// Clusters on a parent cycle are reachable from no root and are left out;
/// [`validate_tree_structure`](super::validate_tree_structure) reports them
/// as [`IssueKind::ParentCycle`](super::IssueKind::ParentCycle).
pub fn build_treemap(index: &ClusterIndex<'_>) -> TreemapNode {
    let roots = index.roots();
    let zero_level: Vec<&Cluster> = roots.iter().copied().filter(|c| c.level == 0).collect();

    if let [only] = zero_level.as_slice() {
        if roots.len() == 1 {
            return subtree(index, only, &mut vec![false; index.len()]);
        }
    }

    let mut visited = vec![false; index.len()];
    let children: Vec<TreemapNode> = roots
        .into_iter()
        .map(|c| subtree(index, c, &mut visited))
        .collect();

    TreemapNode {
        id: String::new(),
        label: ROOT_LABEL.to_string(),
        takeaway: String::new(),
        level: 0,
        value: children.iter().map(|c| c.value).sum(),
        children,
    }
}

fn subtree(index: &ClusterIndex<'_>, cluster: &Cluster, visited: &mut [bool]) -> TreemapNode {
    let mut node = TreemapNode::from_cluster(cluster);
    let Some(pos) = index.position(&cluster.id) else {
        return node;
    };
    if visited[pos] {
        return node;
    }
    visited[pos] = true;
    node.children = index
        .children_at(pos)
        .into_iter()
        .map(|c| subtree(index, c, visited))
        .collect();
    node
}
