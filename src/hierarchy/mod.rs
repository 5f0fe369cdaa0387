//! Tree structure over a report's clusters.
//!
//! Clusters arrive as a flat list where each node only names its parent.
//! Everything the views need is derived from one index built per report:
//!
//! ```text
//! clusters (flat, parent back-refs)
//!        │  ClusterIndex::build
//!        ▼
//! ClusterIndex ──┬── build_treemap   → TreemapNode (nested, value-weighted)
//!                ├── level_counts    → ReportStats (clusters per level)
//!                └── validate        → HealthReport
//!
//! clusters + arguments ── scatter_series(level) → ScatterSeries per cluster
//! ```
//!
//! Levels count downward from the coarsest grouping (level 1). Some
//! pipelines also emit a single level-0 "whole report" cluster; the index
//! and treemap accept it as the root.

mod index;
mod scatter;
mod stats;
mod treemap;
mod validate;

pub use index::ClusterIndex;
pub use scatter::{scatter_series, ScatterSeries};
pub use stats::ReportStats;
pub use treemap::{build_treemap, TreemapNode, ROOT_LABEL};
pub use validate::{
    validate_tree_structure, HealthCheck, HealthReport, IssueKind, Severity, ValidationIssue,
    ValidationReport,
};
