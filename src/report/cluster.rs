//! Clusters and arguments: the two record types of a report document.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A single extracted opinion, projected to 2D for the scatter views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    /// Unique identifier.
    pub arg_id: String,
    /// Opinion text.
    pub argument: String,
    /// Projected x coordinate.
    pub x: f64,
    /// Projected y coordinate.
    pub y: f64,
    /// Containing cluster ids, one per hierarchy level.
    #[serde(default)]
    pub cluster_ids: Vec<String>,
    /// Source comment, when the pipeline recorded it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<String>,
    /// Free-form attributes attached to the source comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<serde_json::Map<String, serde_json::Value>>,
}

impl Argument {
    /// Whether this argument is a member of `cluster_id`.
    pub fn belongs_to(&self, cluster_id: &str) -> bool {
        self.cluster_ids.iter().any(|id| id == cluster_id)
    }

    /// Projected position as an `(x, y)` pair.
    pub fn point(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// A node of the opinion hierarchy.
///
/// Level 1 is the coarsest grouping; larger levels are finer. Clusters are
/// produced upstream and only ever read here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Unique identifier.
    pub id: String,
    /// Hierarchy level (1 = top).
    pub level: u32,
    /// Parent cluster id; `None` at the top level.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub parent: Option<String>,
    /// Short title.
    #[serde(default)]
    pub label: String,
    /// Description of what the members have in common.
    #[serde(default)]
    pub takeaway: String,
    /// Number of member arguments.
    #[serde(default)]
    pub value: u64,
    /// Density rank among same-level peers in `[0, 1]`; lower is denser.
    #[serde(default)]
    pub density_rank_percentile: f64,
}

impl Cluster {
    /// Create a cluster with empty label and takeaway.
    pub fn new(id: impl Into<String>, level: u32, value: u64, density_rank_percentile: f64) -> Self {
        Self {
            id: id.into(),
            level,
            parent: None,
            label: String::new(),
            takeaway: String::new(),
            value,
            density_rank_percentile,
        }
    }

    /// Set the parent id.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the takeaway text.
    pub fn with_takeaway(mut self, takeaway: impl Into<String>) -> Self {
        self.takeaway = takeaway.into();
        self
    }

    /// Whether the cluster sits at the top of its lineage.
    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cluster[{}] L{} ({} args, density {:.2}): {}",
            self.id, self.level, self.value, self.density_rank_percentile, self.label
        )
    }
}

// The pipeline writes "" for the parent of top-level (and root) clusters.
fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let parent = Option::<String>::deserialize(deserializer)?;
    Ok(parent.filter(|p| !p.is_empty()))
}
