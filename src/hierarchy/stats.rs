//! Summary counts of a report.

use std::collections::BTreeMap;

use serde::Serialize;

use super::ClusterIndex;
use crate::report::Report;

/// Comment → argument → cluster funnel of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportStats {
    /// Raw comments fed to the pipeline.
    pub comment_num: u64,
    /// Extracted arguments.
    pub argument_num: usize,
    /// Clusters per level.
    pub level_counts: BTreeMap<u32, usize>,
}

impl ReportStats {
    /// Compute the counts of `report`.
    pub fn from_report(report: &Report) -> Self {
        let index = ClusterIndex::build(&report.clusters);
        Self {
            comment_num: report.comment_num,
            argument_num: report.arguments.len(),
            level_counts: index.level_counts(),
        }
    }

    /// Clusters at `level` (0 when the level is absent).
    pub fn clusters_at(&self, level: u32) -> usize {
        self.level_counts.get(&level).copied().unwrap_or(0)
    }

    /// Number of levels present.
    pub fn num_levels(&self) -> usize {
        self.level_counts.len()
    }

    /// Arguments per comment; 0 when there were no comments.
    pub fn arguments_per_comment(&self) -> f64 {
        if self.comment_num == 0 {
            return 0.0;
        }
        self.argument_num as f64 / self.comment_num as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Cluster;

    #[test]
    fn counts_clusters_per_level() {
        let report = Report {
            comment_num: 8,
            clusters: vec![
                Cluster::new("1_0", 1, 3, 0.0),
                Cluster::new("1_1", 1, 3, 0.0),
                Cluster::new("2_0", 2, 3, 0.0).with_parent("1_0"),
                Cluster::new("2_1", 2, 3, 0.0).with_parent("1_0"),
                Cluster::new("2_2", 2, 3, 0.0).with_parent("1_1"),
            ],
            ..Default::default()
        };

        let stats = report.stats();
        assert_eq!(stats.clusters_at(1), 2);
        assert_eq!(stats.clusters_at(2), 3);
        assert_eq!(stats.clusters_at(3), 0);
        assert_eq!(stats.num_levels(), 2);
        assert_eq!(stats.arguments_per_comment(), 0.0);
    }

    #[test]
    fn empty_report_has_no_levels() {
        let stats = Report::default().stats();
        assert_eq!(stats.num_levels(), 0);
        assert_eq!(stats.arguments_per_comment(), 0.0);
    }
}
