//! Report index entries and site metadata.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Processing status of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Pipeline finished; the document can be fetched.
    Ready,
    /// Pipeline still running.
    Processing,
    /// Pipeline failed.
    Error,
    /// Any status this crate does not know about.
    #[serde(untagged)]
    Other(String),
}

impl ReportStatus {
    /// Whether the report document can be fetched.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => write!(f, "ready"),
            Self::Processing => write!(f, "processing"),
            Self::Error => write!(f, "error"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// One entry of the report index (`GET /reports`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportListing {
    /// URL slug.
    pub slug: String,
    /// Processing status.
    pub status: ReportStatus,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Whether the report is a public-comment consultation.
    #[serde(default, rename = "isPubcom")]
    pub is_pubcom: bool,
}

/// Site metadata (`meta/metadata.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMeta {
    /// Whether the metadata is the placeholder shipped with the server.
    #[serde(default)]
    pub is_default: bool,
    /// Who published the reports.
    #[serde(default)]
    pub reporter: String,
    /// Message from the reporter.
    #[serde(default)]
    pub message: String,
    /// Link to the reporter's site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_link: Option<String>,
    /// Accent colour, e.g. `#2577b1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_color: Option<String>,
}
