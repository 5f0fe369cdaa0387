//! Per-cluster point series for the scatter views.

use std::collections::HashMap;

use serde::Serialize;

use crate::report::{Argument, Cluster};

/// The points of one cluster at the plotted level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    /// Cluster id.
    pub cluster_id: String,
    /// Cluster label, used for the centre annotation.
    pub label: String,
    /// Member argument ids, aligned with `points`.
    pub arg_ids: Vec<String>,
    /// Projected member positions.
    pub points: Vec<(f64, f64)>,
}

impl ScatterSeries {
    /// Mean position of the members, `None` for an empty series.
    pub fn center(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f64;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), &(x, y)| (sx + x, sy + y));
        Some((sx / n, sy / n))
    }

    /// Number of plotted members.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no member was plotted.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Build one series per cluster at `level`, in cluster order.
///
/// Each argument contributes a point to every plotted cluster named in its
/// `cluster_ids`. Clusters absent from `clusters` (for example dropped by
/// the density filter) get no series, so their members are not drawn.
pub fn scatter_series(clusters: &[Cluster], arguments: &[Argument], level: u32) -> Vec<ScatterSeries> {
    let mut series: Vec<ScatterSeries> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();

    for c in clusters.iter().filter(|c| c.level == level) {
        if slot.contains_key(c.id.as_str()) {
            continue;
        }
        let _ = slot.insert(c.id.as_str(), series.len());
        series.push(ScatterSeries {
            cluster_id: c.id.clone(),
            label: c.label.clone(),
            arg_ids: Vec::new(),
            points: Vec::new(),
        });
    }

    for arg in arguments {
        for cid in &arg.cluster_ids {
            if let Some(&i) = slot.get(cid.as_str()) {
                series[i].arg_ids.push(arg.arg_id.clone());
                series[i].points.push(arg.point());
            }
        }
    }

    series
}
