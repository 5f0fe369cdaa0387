//! The hierarchical result document.
//!
//! A report is produced once by the upstream pipeline (opinion extraction,
//! embedding, hierarchical clustering, labelling) and consumed read-only:
//!
//! ```text
//! Report
//! ├── comment_num            raw comments fed to the pipeline
//! ├── arguments[]            extracted opinions, 2D projected
//! │     └── cluster_ids[]    one cluster per level
//! ├── clusters[]             forest, linked by `parent` only
//! │     level 1  ── coarse
//! │     level 2  ── finer, parent at level 1
//! │     ...      ── deepest level = max(level)
//! └── config                 provenance (question, plan, per-step models)
//! ```

mod cluster;
mod listing;
mod provenance;

pub use cluster::{Argument, Cluster};
pub use listing::{ReportListing, ReportMeta, ReportStatus};
pub use provenance::{PlanStep, ReportConfig, StepProvenance};

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::hierarchy::{ClusterIndex, ReportStats};

/// The aggregate root of a report (the pipeline's `Result` document).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Number of raw comments.
    #[serde(default)]
    pub comment_num: u64,
    /// Extracted arguments.
    #[serde(default)]
    pub arguments: Vec<Argument>,
    /// Every cluster of every level.
    #[serde(default)]
    pub clusters: Vec<Cluster>,
    /// Overall summary text.
    #[serde(default)]
    pub overview: String,
    /// Provenance.
    #[serde(default)]
    pub config: ReportConfig,
}

impl Report {
    /// Parse a report document.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Parse a report document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read and parse a report file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let report: Self = serde_json::from_slice(&bytes)?;
        tracing::debug!(
            path = %path.display(),
            arguments = report.arguments.len(),
            clusters = report.clusters.len(),
            "loaded report"
        );
        Ok(report)
    }

    /// Build the parent→children index for this report's clusters.
    pub fn index(&self) -> ClusterIndex<'_> {
        ClusterIndex::build(&self.clusters)
    }

    /// Comment, argument and per-level cluster counts.
    pub fn stats(&self) -> ReportStats {
        ReportStats::from_report(self)
    }

    /// Arguments that are members of `cluster_id`.
    pub fn arguments_in<'a>(&'a self, cluster_id: &'a str) -> impl Iterator<Item = &'a Argument> {
        self.arguments.iter().filter(move |a| a.belongs_to(cluster_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "comment_num": 3,
        "arguments": [
            {"arg_id": "A0_0", "argument": "x", "x": 0.0, "y": 0.0, "cluster_ids": ["0", "1_0", "2_0"]},
            {"arg_id": "A1_0", "argument": "y", "x": 1.0, "y": 1.0, "cluster_ids": ["0", "1_0", "2_1"]}
        ],
        "clusters": [
            {"level": 0, "id": "0", "label": "all", "takeaway": "", "value": 2, "parent": "", "density_rank_percentile": 0},
            {"level": 1, "id": "1_0", "label": "a", "takeaway": "", "value": 2, "parent": "0", "density_rank_percentile": 0.5},
            {"level": 2, "id": "2_0", "label": "b", "takeaway": "", "value": 1, "parent": "1_0", "density_rank_percentile": 0.1},
            {"level": 2, "id": "2_1", "label": "c", "takeaway": "", "value": 1, "parent": "1_0", "density_rank_percentile": 0.9}
        ],
        "config": {"question": "q", "plan": []}
    }"#;

    #[test]
    fn parses_document_with_defaults() {
        let report = Report::from_json_str(DOC).unwrap();
        assert_eq!(report.comment_num, 3);
        assert_eq!(report.arguments.len(), 2);
        assert_eq!(report.clusters.len(), 4);
        assert_eq!(report.overview, "");
        assert_eq!(report.config.question, "q");
        assert!(report.clusters[0].parent.is_none());
    }

    #[test]
    fn arguments_in_filters_by_membership() {
        let report = Report::from_json_str(DOC).unwrap();
        let ids: Vec<_> = report.arguments_in("2_1").map(|a| a.arg_id.as_str()).collect();
        assert_eq!(ids, vec!["A1_0"]);
        assert_eq!(report.arguments_in("1_0").count(), 2);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = Report::from_json_str("{\"clusters\": 3}").unwrap_err();
        assert!(matches!(err, crate::Error::Json(_)));
    }

    #[test]
    fn reads_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hierarchical_result.json");
        std::fs::write(&path, DOC).unwrap();

        let report = Report::from_path(&path).unwrap();
        assert_eq!(report.clusters.len(), 4);
        assert!(matches!(
            Report::from_path(dir.path().join("missing.json")),
            Err(crate::Error::Io(_))
        ));
    }
}
