//! Where report documents come from.
//!
//! Both sources expose the same three resources:
//!
//! | Resource       | HTTP (`server` mode)          | Static export (`export` mode) |
//! |----------------|-------------------------------|-------------------------------|
//! | report index   | `GET {base}/reports`          | `reports/index.json`          |
//! | one report     | `GET {base}/reports/{slug}`   | `reports/{slug}.json`         |
//! | site metadata  | `GET {base}/meta/metadata.json` | `meta/metadata.json`        |

#[cfg(feature = "http")]
mod http;
mod static_dir;

#[cfg(feature = "http")]
pub use http::HttpSource;
pub use static_dir::StaticDirSource;

use crate::config::{OutputMode, SourceConfig};
use crate::error::{Error, Result};
use crate::report::{Report, ReportListing, ReportMeta};

/// A provider of report documents.
pub trait ReportSource {
    /// The report index.
    fn list_reports(&self) -> Result<Vec<ReportListing>>;

    /// One report document.
    fn fetch_report(&self, slug: &str) -> Result<Report>;

    /// Site metadata.
    fn fetch_meta(&self) -> Result<ReportMeta>;

    /// Index entries whose document can be fetched.
    fn ready_reports(&self) -> Result<Vec<ReportListing>> {
        Ok(self
            .list_reports()?
            .into_iter()
            .filter(|r| r.status.is_ready())
            .collect())
    }
}

/// Open the source selected by `config`.
pub fn open_source(config: &SourceConfig) -> Result<Box<dyn ReportSource>> {
    match config.output_mode {
        OutputMode::Export => Ok(Box::new(StaticDirSource::new(&config.export_dir))),
        #[cfg(feature = "http")]
        OutputMode::Server => Ok(Box::new(HttpSource::from_config(config)?)),
        #[cfg(not(feature = "http"))]
        OutputMode::Server => Err(Error::Config(
            "server mode needs the `http` feature".to_string(),
        )),
    }
}

/// Reject slugs that could escape the reports directory or path.
pub(crate) fn check_slug(slug: &str) -> Result<()> {
    let bad = slug.is_empty()
        || slug == "."
        || slug.contains("..")
        || slug.contains(['/', '\\'])
        || slug.chars().any(char::is_control);
    if bad {
        return Err(Error::InvalidParameter {
            name: "slug",
            message: format!("'{}' is not a report slug", slug.escape_debug()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_checks() {
        assert!(check_slug("example").is_ok());
        assert!(check_slug("pubcom-2024_03").is_ok());
        for bad in ["", ".", "..", "../etc", "a/b", "a\\b", "x\ny"] {
            assert!(check_slug(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn export_mode_opens_static_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("reports")).unwrap();
        std::fs::write(
            dir.path().join("reports").join("index.json"),
            r#"[{"slug":"a","status":"ready"},{"slug":"b","status":"processing"}]"#,
        )
        .unwrap();

        let config = SourceConfig {
            output_mode: OutputMode::Export,
            export_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let source = open_source(&config).unwrap();
        let ready = source.ready_reports().unwrap();
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].slug, "a");
    }
}
