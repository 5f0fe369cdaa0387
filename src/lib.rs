//! # canopy
//!
//! Hierarchical opinion-cluster reports: the result document, dense-cluster
//! selection, and the chart view state built on them.
//!
//! The clustering pipeline runs elsewhere and hands over one JSON document
//! per report. This crate reads it, indexes the cluster forest, picks which
//! deepest-level clusters are dense enough to display, and derives the
//! scatter and treemap data for the selected chart.
//!
//! ```rust
//! use canopy::{dense_clusters, Cluster, DensityFilter};
//!
//! let clusters = vec![
//!     Cluster::new("a", 1, 10, 0.1),
//!     Cluster::new("b", 2, 3, 0.05).with_parent("a"),
//!     Cluster::new("c", 2, 20, 0.5).with_parent("a"),
//! ];
//! let shown = dense_clusters(&clusters, DensityFilter::new(0.2, 5));
//! assert_eq!(shown.len(), 1);
//! assert_eq!(shown[0].id, "a");
//! ```
//!
//! Report loading (`source`) is the only fallible part; the `http` feature
//! (on by default) adds the report API client.

pub mod config;
/// Error types used across `canopy`.
pub mod error;
pub mod hierarchy;
pub mod report;
pub mod select;
pub mod source;
pub mod view;


pub use config::{CanopyConfig, OutputMode, SourceConfig, ViewConfig};
pub use error::{Error, Result};
pub use hierarchy::{
    build_treemap, scatter_series, ClusterIndex, HealthCheck, HealthReport, IssueKind, ReportStats,
    ScatterSeries, Severity, TreemapNode, ValidationIssue, ValidationReport,
};
pub use report::{Argument, Cluster, Report, ReportConfig, ReportListing, ReportMeta, ReportStatus};
pub use select::{
    deepest_level, dense_clusters, dense_clusters_observed, select_dense, select_dense_observed,
    DensityFilter, SelectionObserver, TracingObserver,
};
pub use source::{open_source, ReportSource, StaticDirSource};
pub use view::{ChartType, DisplayedReport, ViewState};

#[cfg(feature = "http")]
pub use source::HttpSource;
