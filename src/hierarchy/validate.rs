//! Report validation and health checking.
//!
//! Upstream documents are trusted for display but not for structure. The
//! checks here surface the problems that make the views misleading:
//! - duplicate cluster ids
//! - parent ids that do not resolve
//! - level gaps (a level-L cluster whose parent is not at level L-1)
//! - parent cycles
//! - out-of-range density percentiles
//! - arguments pointing at unknown clusters, or at two clusters of one level
//!
//! # Example
//!
//! ```rust
//! use canopy::{HealthCheck, Report};
//!
//! let report = Report::default();
//! let health = report.health_check();
//! assert!(health.is_healthy());
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};

use super::ClusterIndex;
use crate::report::Report;

/// How badly a finding undermines the report views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Worth knowing; views are unaffected.
    Info,
    /// Views render but may mislead.
    Warning,
    /// Some cluster is misplaced or miscounted.
    Error,
    /// Clusters drop out of the hierarchy entirely.
    Critical,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What a health check found wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    /// Two clusters share an id.
    DuplicateId,
    /// `density_rank_percentile` is outside `[0, 1]` or NaN.
    PercentileOutOfRange,
    /// A cluster below level 1 has no parent.
    MissingParent,
    /// A parent id names no cluster.
    DanglingParent,
    /// A parent is not exactly one level up.
    LevelGap,
    /// Clusters unreachable from every root.
    ParentCycle,
    /// An argument names a cluster that does not exist.
    UnknownClusterRef,
    /// An argument sits in two clusters of one level.
    SharedLevel,
    /// A cluster's `value` disagrees with its member arguments.
    ValueMismatch,
}

impl IssueKind {
    /// Severity this kind is reported with.
    pub fn severity(self) -> Severity {
        match self {
            IssueKind::ValueMismatch => Severity::Info,
            IssueKind::PercentileOutOfRange | IssueKind::UnknownClusterRef => Severity::Warning,
            IssueKind::DuplicateId
            | IssueKind::MissingParent
            | IssueKind::DanglingParent
            | IssueKind::LevelGap
            | IssueKind::SharedLevel => Severity::Error,
            IssueKind::ParentCycle => Severity::Critical,
        }
    }

    /// Short description used in rendered reports.
    pub fn describe(self) -> &'static str {
        match self {
            IssueKind::DuplicateId => "duplicate cluster id",
            IssueKind::PercentileOutOfRange => "density percentile outside [0, 1]",
            IssueKind::MissingParent => "cluster below level 1 has no parent",
            IssueKind::DanglingParent => "parent id does not exist",
            IssueKind::LevelGap => "parent is not one level up",
            IssueKind::ParentCycle => "clusters not reachable from any root",
            IssueKind::UnknownClusterRef => "argument references unknown cluster",
            IssueKind::SharedLevel => "argument belongs to two clusters on one level",
            IssueKind::ValueMismatch => "value differs from member count",
        }
    }
}

/// A single finding: what, on which cluster or argument, and the numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// What went wrong.
    pub kind: IssueKind,
    /// Cluster or argument id involved, when there is one.
    pub subject: Option<String>,
    /// The offending values.
    pub detail: String,
}

impl ValidationIssue {
    /// Severity of this finding.
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.severity(), self.kind.describe())?;
        if let Some(id) = &self.subject {
            write!(f, " [{id}]")?;
        }
        if !self.detail.is_empty() {
            write!(f, " ({})", self.detail)?;
        }
        Ok(())
    }
}

/// Findings of one health check, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// All issues found.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    fn flag(&mut self, kind: IssueKind, subject: Option<&str>, detail: impl Into<String>) {
        self.issues.push(ValidationIssue {
            kind,
            subject: subject.map(str::to_string),
            detail: detail.into(),
        });
    }

    /// No error or critical findings.
    pub fn is_healthy(&self) -> bool {
        self.issues.iter().all(|i| i.severity() < Severity::Error)
    }

    /// No findings at all.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Whether any finding is of `kind`.
    pub fn has(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }

    /// Findings at `min_severity` or worse.
    pub fn issues_at_level(&self, min_severity: Severity) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity() >= min_severity)
            .collect()
    }

    /// Findings per severity.
    pub fn counts(&self) -> BTreeMap<Severity, usize> {
        let mut counts = BTreeMap::new();
        for issue in &self.issues {
            *counts.entry(issue.severity()).or_default() += 1;
        }
        counts
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_clean() {
            return write!(f, "no issues");
        }
        let summary: Vec<String> = self
            .counts()
            .iter()
            .rev()
            .map(|(sev, n)| format!("{n} {sev}"))
            .collect();
        writeln!(f, "{} issues: {}", self.issues.len(), summary.join(", "))?;
        for issue in &self.issues {
            writeln!(f, "  {issue}")?;
        }
        Ok(())
    }
}

/// Health report with additional statistics.
#[derive(Debug, Clone)]
pub struct HealthReport {
    /// Validation issues.
    pub validation: ValidationReport,
    /// Total number of clusters.
    pub cluster_count: usize,
    /// Deepest level present.
    pub deepest_level: u32,
    /// Clusters at the deepest level.
    pub leaf_count: usize,
    /// Clusters per level.
    pub level_sizes: BTreeMap<u32, usize>,
    /// Average number of children over clusters that have any.
    pub avg_branching_factor: f64,
}

impl HealthReport {
    /// Check if the report is healthy (no errors or critical issues).
    pub fn is_healthy(&self) -> bool {
        self.validation.is_healthy()
    }
}

impl std::fmt::Display for HealthReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Report Health")?;
        writeln!(f, "=============")?;
        writeln!(
            f,
            "Clusters: {} ({} at deepest level {})",
            self.cluster_count, self.leaf_count, self.deepest_level
        )?;
        for (level, n) in &self.level_sizes {
            writeln!(f, "  level {level}: {n}")?;
        }
        writeln!(f, "Avg branching factor: {:.2}", self.avg_branching_factor)?;
        writeln!(f)?;
        write!(f, "{}", self.validation)
    }
}

/// Trait for types that can be health-checked.
pub trait HealthCheck {
    /// Perform a health check and return a report.
    fn health_check(&self) -> HealthReport;

    /// Quick check: returns true if healthy.
    fn is_healthy(&self) -> bool {
        self.health_check().is_healthy()
    }
}

impl HealthCheck for Report {
    fn health_check(&self) -> HealthReport {
        let index = ClusterIndex::build(&self.clusters);
        let mut validation = validate_tree_structure(&index);

        let mut seen = HashSet::new();
        for c in &self.clusters {
            if !seen.insert(c.id.as_str()) {
                validation.flag(IssueKind::DuplicateId, Some(c.id.as_str()), "");
            }

            if !(0.0..=1.0).contains(&c.density_rank_percentile) {
                validation.flag(
                    IssueKind::PercentileOutOfRange,
                    Some(c.id.as_str()),
                    format!("percentile {}", c.density_rank_percentile),
                );
            }

            match c.parent.as_deref() {
                None if c.level > 1 => validation.flag(
                    IssueKind::MissingParent,
                    Some(c.id.as_str()),
                    format!("level {}", c.level),
                ),
                None => {}
                Some(pid) => match index.get(pid) {
                    None => validation.flag(
                        IssueKind::DanglingParent,
                        Some(c.id.as_str()),
                        format!("parent {pid}"),
                    ),
                    Some(parent) if parent.level + 1 != c.level => validation.flag(
                        IssueKind::LevelGap,
                        Some(c.id.as_str()),
                        format!("level {}, parent {pid} at level {}", c.level, parent.level),
                    ),
                    Some(_) => {}
                },
            }
        }

        let mut members: HashMap<&str, u64> = HashMap::new();
        for arg in &self.arguments {
            let mut levels_seen = HashSet::new();
            for cid in &arg.cluster_ids {
                match index.get(cid) {
                    None => validation.flag(
                        IssueKind::UnknownClusterRef,
                        Some(arg.arg_id.as_str()),
                        format!("cluster {cid}"),
                    ),
                    Some(c) => {
                        *members.entry(c.id.as_str()).or_default() += 1;
                        if !levels_seen.insert(c.level) {
                            validation.flag(
                                IssueKind::SharedLevel,
                                Some(arg.arg_id.as_str()),
                                format!("level {}", c.level),
                            );
                        }
                    }
                }
            }
        }

        // Counts only make sense when the document carries its arguments.
        if !self.arguments.is_empty() {
            for c in &self.clusters {
                let found = members.get(c.id.as_str()).copied().unwrap_or(0);
                if found != c.value {
                    validation.flag(
                        IssueKind::ValueMismatch,
                        Some(c.id.as_str()),
                        format!("value {}, members {found}", c.value),
                    );
                }
            }
        }

        let level_sizes = index.level_counts();
        let deepest_level = index.deepest_level();
        let leaf_count = level_sizes.get(&deepest_level).copied().unwrap_or(0);
        let parents: Vec<&[usize]> = index
            .child_positions()
            .iter()
            .filter(|c| !c.is_empty())
            .map(Vec::as_slice)
            .collect();
        let avg_branching_factor = if parents.is_empty() {
            0.0
        } else {
            parents.iter().map(|c| c.len()).sum::<usize>() as f64 / parents.len() as f64
        };

        HealthReport {
            validation,
            cluster_count: self.clusters.len(),
            deepest_level,
            leaf_count,
            level_sizes,
            avg_branching_factor,
        }
    }
}

/// Check that every cluster is reachable from a root.
///
/// Each cluster has at most one parent, so a cluster unreachable from every
/// root sits on (or below) a parent cycle.
pub fn validate_tree_structure(index: &ClusterIndex<'_>) -> ValidationReport {
    let mut report = ValidationReport::default();
    let clusters = index.clusters();

    let mut reachable = vec![false; clusters.len()];
    let mut stack: Vec<usize> = index
        .roots()
        .iter()
        .filter_map(|c| index.position(&c.id))
        .collect();

    while let Some(pos) = stack.pop() {
        if reachable[pos] {
            continue;
        }
        reachable[pos] = true;
        stack.extend(index.child_positions()[pos].iter().copied());
    }

    let cyclic: Vec<&str> = clusters
        .iter()
        .enumerate()
        .filter(|&(pos, _)| !reachable[pos] && index.parent_at(pos).is_some())
        .map(|(_, c)| c.id.as_str())
        .collect();

    if !cyclic.is_empty() {
        report.flag(
            IssueKind::ParentCycle,
            None,
            format!("{} clusters, first few {:?}", cyclic.len(), &cyclic[..cyclic.len().min(5)]),
        );
    }

    report
}

#[cfg(test)]
#[allow(clippy::unwrap_used, unused_results)]
mod tests {
    use super::*;
    use crate::report::{Argument, Cluster};
    use proptest::prelude::*;

    fn arg(id: &str, cluster_ids: &[&str]) -> Argument {
        Argument {
            arg_id: id.to_string(),
            argument: String::new(),
            x: 0.0,
            y: 0.0,
            cluster_ids: cluster_ids.iter().map(|s| s.to_string()).collect(),
            comment_id: None,
            attributes: None,
        }
    }

    fn healthy_report() -> Report {
        Report {
            comment_num: 3,
            arguments: vec![
                arg("a0", &["1_0", "2_0"]),
                arg("a1", &["1_0", "2_0"]),
                arg("a2", &["1_0", "2_1"]),
            ],
            clusters: vec![
                Cluster::new("1_0", 1, 3, 0.5),
                Cluster::new("2_0", 2, 2, 0.1).with_parent("1_0"),
                Cluster::new("2_1", 2, 1, 0.9).with_parent("1_0"),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn well_formed_report_is_clean() {
        let health = healthy_report().health_check();
        assert!(health.validation.is_clean(), "{}", health);
        assert_eq!(health.deepest_level, 2);
        assert_eq!(health.leaf_count, 2);
        assert_eq!(health.avg_branching_factor, 2.0);
    }

    #[test]
    fn level_gap_is_an_error() {
        let mut report = healthy_report();
        report.clusters.push(Cluster::new("3_0", 3, 0, 0.1).with_parent("1_0"));
        let health = report.health_check();
        assert!(!health.is_healthy());
        assert!(health.validation.has(IssueKind::LevelGap));
    }

    #[test]
    fn dangling_parent_and_missing_parent() {
        let mut report = healthy_report();
        report.clusters.push(Cluster::new("2_9", 2, 0, 0.1).with_parent("1_9"));
        report.clusters.push(Cluster::new("2_8", 2, 0, 0.1));
        let validation = report.health_check().validation;
        assert!(validation.has(IssueKind::DanglingParent));
        assert!(validation.has(IssueKind::MissingParent));

        let dangling = validation
            .issues
            .iter()
            .find(|i| i.kind == IssueKind::DanglingParent)
            .unwrap();
        assert_eq!(dangling.subject.as_deref(), Some("2_9"));
        assert_eq!(
            dangling.to_string(),
            "error: parent id does not exist [2_9] (parent 1_9)"
        );
    }

    #[test]
    fn duplicate_ids_and_bad_percentiles() {
        let mut report = healthy_report();
        report.clusters.push(Cluster::new("2_0", 2, 0, 1.5).with_parent("1_0"));
        let health = report.health_check();
        let counts = health.validation.counts();
        assert!(counts.get(&Severity::Error).copied().unwrap_or(0) >= 1);
        assert!(health
            .validation
            .issues_at_level(Severity::Warning)
            .iter()
            .any(|i| i.kind == IssueKind::PercentileOutOfRange));
        assert!(health.validation.has(IssueKind::DuplicateId));
    }

    #[test]
    fn argument_problems_are_reported() {
        let mut report = healthy_report();
        report.arguments.push(arg("a3", &["1_0", "2_0", "2_1"]));
        report.arguments.push(arg("a4", &["1_0", "2_5"]));
        let validation = report.health_check().validation;
        assert!(validation.has(IssueKind::SharedLevel));
        assert!(validation.has(IssueKind::UnknownClusterRef));
        // a3 and a4 push 1_0 to five members against a value of three
        assert!(validation.has(IssueKind::ValueMismatch));
        assert!(!validation.is_healthy());
    }

    #[test]
    fn parent_cycle_is_critical() {
        let clusters = vec![
            Cluster::new("x", 2, 0, 0.1).with_parent("y"),
            Cluster::new("y", 2, 0, 0.1).with_parent("x"),
        ];
        let index = ClusterIndex::build(&clusters);
        let report = validate_tree_structure(&index);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::ParentCycle);
        assert_eq!(report.issues[0].severity(), Severity::Critical);
        assert_eq!(report.counts().get(&Severity::Critical), Some(&1));
    }

    fn arb_forest() -> impl Strategy<Value = Vec<Cluster>> {
        (1usize..6, proptest::collection::vec(1usize..5, 0..20)).prop_map(|(tops, fanouts)| {
            let mut clusters: Vec<Cluster> = (0..tops)
                .map(|i| Cluster::new(format!("1_{i}"), 1, 0, 0.5))
                .collect();
            let mut frontier: Vec<String> = clusters.iter().map(|c| c.id.clone()).collect();
            for (level, fanout) in (2u32..).zip(fanouts.into_iter().take(3)) {
                let mut next = Vec::new();
                for parent in &frontier {
                    for k in 0..fanout {
                        let id = format!("{parent}.{k}");
                        clusters.push(Cluster::new(id.clone(), level, 0, 0.5).with_parent(parent.clone()));
                        next.push(id);
                    }
                }
                frontier = next;
            }
            clusters
        })
    }

    proptest! {
        #[test]
        fn generated_forests_are_healthy(clusters in arb_forest()) {
            let report = Report { clusters, ..Default::default() };
            let health = report.health_check();
            prop_assert!(health.is_healthy(), "{}", health);
        }
    }
}
