//! Parent→children index over a report's clusters.

use std::collections::{BTreeMap, HashMap};

use crate::report::Cluster;

/// Forest index over a cluster list.
///
/// Clusters only carry a `parent` back-reference; this builds the forward
/// links once so tree walks do not rescan the list. Positions refer to the
/// borrowed slice.
#[derive(Debug, Clone)]
pub struct ClusterIndex<'a> {
    clusters: &'a [Cluster],
    /// Position of each id (first occurrence wins).
    by_id: HashMap<&'a str, usize>,
    /// Parent position of each cluster (`None` for roots).
    parents: Vec<Option<usize>>,
    /// Child positions of each cluster, in source order.
    children: Vec<Vec<usize>>,
    /// Clusters without a resolvable parent, in source order.
    roots: Vec<usize>,
    /// Clusters whose parent id is set but unknown.
    dangling: Vec<usize>,
    /// Positions grouped by level.
    levels: BTreeMap<u32, Vec<usize>>,
}

impl<'a> ClusterIndex<'a> {
    /// Index `clusters`.
    pub fn build(clusters: &'a [Cluster]) -> Self {
        let mut by_id = HashMap::with_capacity(clusters.len());
        for (pos, c) in clusters.iter().enumerate() {
            let _ = by_id.entry(c.id.as_str()).or_insert(pos);
        }

        let mut parents = vec![None; clusters.len()];
        let mut children = vec![Vec::new(); clusters.len()];
        let mut roots = Vec::new();
        let mut dangling = Vec::new();
        let mut levels: BTreeMap<u32, Vec<usize>> = BTreeMap::new();

        for (pos, c) in clusters.iter().enumerate() {
            levels.entry(c.level).or_default().push(pos);
            match c.parent.as_deref() {
                None => roots.push(pos),
                Some(pid) => match by_id.get(pid) {
                    Some(&ppos) if ppos != pos => {
                        parents[pos] = Some(ppos);
                        children[ppos].push(pos);
                    }
                    _ => {
                        dangling.push(pos);
                        roots.push(pos);
                    }
                },
            }
        }

        Self {
            clusters,
            by_id,
            parents,
            children,
            roots,
            dangling,
            levels,
        }
    }

    /// The indexed clusters.
    pub fn clusters(&self) -> &'a [Cluster] {
        self.clusters
    }

    /// Number of indexed clusters.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Look up a cluster by id.
    pub fn get(&self, id: &str) -> Option<&'a Cluster> {
        self.position(id).map(|pos| &self.clusters[pos])
    }

    /// Position of `id` in the indexed slice.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Parent of `id`, if it has a resolvable one.
    pub fn parent(&self, id: &str) -> Option<&'a Cluster> {
        let pos = self.position(id)?;
        self.parents[pos].map(|p| &self.clusters[p])
    }

    /// Children of `id` in source order (empty for unknown ids).
    pub fn children(&self, id: &str) -> Vec<&'a Cluster> {
        self.position(id)
            .map(|pos| self.children_at(pos))
            .unwrap_or_default()
    }

    pub(crate) fn children_at(&self, pos: usize) -> Vec<&'a Cluster> {
        self.children[pos].iter().map(|&c| &self.clusters[c]).collect()
    }

    pub(crate) fn parent_at(&self, pos: usize) -> Option<usize> {
        self.parents[pos]
    }

    pub(crate) fn child_positions(&self) -> &[Vec<usize>] {
        &self.children
    }

    /// Clusters without a resolvable parent.
    ///
    /// Clusters whose parent id is unknown are treated as roots; see
    /// [`ClusterIndex::dangling`].
    pub fn roots(&self) -> Vec<&'a Cluster> {
        self.roots.iter().map(|&p| &self.clusters[p]).collect()
    }

    /// Clusters whose parent id does not resolve.
    pub fn dangling(&self) -> Vec<&'a Cluster> {
        self.dangling.iter().map(|&p| &self.clusters[p]).collect()
    }

    /// Clusters at `level` in source order.
    pub fn level(&self, level: u32) -> Vec<&'a Cluster> {
        self.levels
            .get(&level)
            .map(|ps| ps.iter().map(|&p| &self.clusters[p]).collect())
            .unwrap_or_default()
    }

    /// Largest level present (0 when empty).
    pub fn deepest_level(&self) -> u32 {
        self.levels.keys().next_back().copied().unwrap_or(0)
    }

    /// Number of clusters at each level.
    pub fn level_counts(&self) -> BTreeMap<u32, usize> {
        self.levels.iter().map(|(&l, ps)| (l, ps.len())).collect()
    }

    /// Ancestors of `id`, nearest first.
    ///
    /// Stops if a parent chain loops back on itself.
    pub fn ancestors(&self, id: &str) -> Vec<&'a Cluster> {
        let mut out = Vec::new();
        let Some(mut pos) = self.position(id) else {
            return out;
        };
        let mut seen = vec![false; self.clusters.len()];
        seen[pos] = true;
        while let Some(parent) = self.parents[pos] {
            if seen[parent] {
                break;
            }
            seen[parent] = true;
            out.push(&self.clusters[parent]);
            pos = parent;
        }
        out
    }

    /// Labels from the root down to `id`, for breadcrumbs.
    pub fn path_labels(&self, id: &str) -> Vec<&'a str> {
        let Some(cluster) = self.get(id) else {
            return Vec::new();
        };
        let mut labels: Vec<&str> = self
            .ancestors(id)
            .into_iter()
            .map(|c| c.label.as_str())
            .collect();
        labels.reverse();
        labels.push(cluster.label.as_str());
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forest() -> Vec<Cluster> {
        vec![
            Cluster::new("1_0", 1, 30, 0.5).with_label("Environment"),
            Cluster::new("1_1", 1, 20, 0.5).with_label("Transport"),
            Cluster::new("2_0", 2, 10, 0.1).with_parent("1_0").with_label("Parks"),
            Cluster::new("2_1", 2, 20, 0.2).with_parent("1_0").with_label("Trees"),
            Cluster::new("2_2", 2, 20, 0.3).with_parent("1_1").with_label("Buses"),
            Cluster::new("3_0", 3, 4, 0.3).with_parent("2_0").with_label("Playgrounds"),
        ]
    }

    #[test]
    fn children_follow_source_order() {
        let clusters = forest();
        let index = ClusterIndex::build(&clusters);

        let kids: Vec<_> = index.children("1_0").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(kids, vec!["2_0", "2_1"]);
        assert!(index.children("3_0").is_empty());
        assert!(index.children("nope").is_empty());
        assert_eq!(index.parent("2_2").map(|c| c.id.as_str()), Some("1_1"));
        assert!(index.parent("1_0").is_none());
    }

    #[test]
    fn levels_and_counts() {
        let clusters = forest();
        let index = ClusterIndex::build(&clusters);

        assert_eq!(index.deepest_level(), 3);
        let counts = index.level_counts();
        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&2), Some(&3));
        assert_eq!(counts.get(&3), Some(&1));
        assert_eq!(index.level(2).len(), 3);
        assert!(index.level(7).is_empty());
    }

    #[test]
    fn ancestors_and_breadcrumbs() {
        let clusters = forest();
        let index = ClusterIndex::build(&clusters);

        let up: Vec<_> = index.ancestors("3_0").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(up, vec!["2_0", "1_0"]);
        assert_eq!(
            index.path_labels("3_0"),
            vec!["Environment", "Parks", "Playgrounds"]
        );
        assert!(index.path_labels("missing").is_empty());
    }

    #[test]
    fn dangling_parents_become_roots() {
        let clusters = vec![
            Cluster::new("1_0", 1, 5, 0.1),
            Cluster::new("2_0", 2, 5, 0.1).with_parent("1_9"),
        ];
        let index = ClusterIndex::build(&clusters);

        assert_eq!(index.roots().len(), 2);
        assert_eq!(index.dangling()[0].id, "2_0");
    }

    #[test]
    fn cyclic_parents_terminate() {
        let clusters = vec![
            Cluster::new("a", 2, 1, 0.0).with_parent("b"),
            Cluster::new("b", 1, 1, 0.0).with_parent("a"),
        ];
        let index = ClusterIndex::build(&clusters);
        assert_eq!(index.ancestors("a").len(), 1);
        assert!(index.roots().is_empty());
    }

    #[test]
    fn empty_index() {
        let index = ClusterIndex::build(&[]);
        assert!(index.is_empty());
        assert_eq!(index.deepest_level(), 0);
        assert!(index.roots().is_empty());
    }
}
