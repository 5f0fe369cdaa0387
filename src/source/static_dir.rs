//! Reports read from a static export directory.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use super::{check_slug, ReportSource};
use crate::error::{Error, Result};
use crate::report::{Report, ReportListing, ReportMeta};

/// Reads a static export directory.
#[derive(Debug, Clone)]
pub struct StaticDirSource {
    root: PathBuf,
}

impl StaticDirSource {
    /// Source rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Export root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_json<T: DeserializeOwned>(&self, rel: &Path, what: &str) -> Result<T> {
        let path = self.root.join(rel);
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound(format!("{what} ({})", path.display())));
            }
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "read {what}");
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl ReportSource for StaticDirSource {
    fn list_reports(&self) -> Result<Vec<ReportListing>> {
        self.read_json(&Path::new("reports").join("index.json"), "report index")
    }

    fn fetch_report(&self, slug: &str) -> Result<Report> {
        check_slug(slug)?;
        self.read_json(
            &Path::new("reports").join(format!("{slug}.json")),
            &format!("report {slug}"),
        )
    }

    fn fetch_meta(&self) -> Result<ReportMeta> {
        self.read_json(&Path::new("meta").join("metadata.json"), "metadata")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn export_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let reports = dir.path().join("reports");
        let meta = dir.path().join("meta");
        std::fs::create_dir_all(&reports).unwrap();
        std::fs::create_dir_all(&meta).unwrap();
        std::fs::write(
            reports.join("index.json"),
            r#"[{"slug":"example","status":"ready","title":"Example","description":"","isPubcom":true}]"#,
        )
        .unwrap();
        std::fs::write(
            reports.join("example.json"),
            r#"{"comment_num":1,"arguments":[],"clusters":[{"id":"1_0","level":1,"parent":"","label":"a","takeaway":"","value":0,"density_rank_percentile":0.5}],"config":{}}"#,
        )
        .unwrap();
        std::fs::write(meta.join("metadata.json"), r#"{"reporter":"Test Reporter","message":"m"}"#)
            .unwrap();
        dir
    }

    #[test]
    fn reads_index_report_and_meta() {
        let dir = export_dir();
        let source = StaticDirSource::new(dir.path());

        let index = source.list_reports().unwrap();
        assert_eq!(index[0].slug, "example");

        let report = source.fetch_report("example").unwrap();
        assert_eq!(report.clusters.len(), 1);
        assert_eq!(report.comment_num, 1);

        assert_eq!(source.fetch_meta().unwrap().reporter, "Test Reporter");
    }

    #[test]
    fn missing_report_is_not_found() {
        let dir = export_dir();
        let source = StaticDirSource::new(dir.path());
        assert!(matches!(source.fetch_report("nope"), Err(Error::NotFound(_))));
    }

    #[test]
    fn traversal_slug_is_rejected() {
        let dir = export_dir();
        let source = StaticDirSource::new(dir.path());
        assert!(matches!(
            source.fetch_report("../meta/metadata"),
            Err(Error::InvalidParameter { name: "slug", .. })
        ));
    }

    #[test]
    fn malformed_report_is_a_json_error() {
        let dir = export_dir();
        std::fs::write(dir.path().join("reports").join("broken.json"), "{").unwrap();
        let source = StaticDirSource::new(dir.path());
        assert!(matches!(source.fetch_report("broken"), Err(Error::Json(_))));
    }
}
