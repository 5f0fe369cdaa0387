//! Dense-cluster selection for the scatter and treemap views.
//!
//! Only the deepest level is filtered. Every coarser level passes through
//! untouched so the hierarchy above the displayed leaves stays intact:
//!
//! ```text
//! level 1   [A]          [B]            kept unconditionally
//!          /   \        /   \
//! level 2 [a1] [a2]   [b1] [b2]         kept iff percentile <= max_density
//!          ✓    ✗      ✓    ✗                    and value >= min_value
//! ```
//!
//! The deepest level is `max(level)` over the list passed in, so reports
//! with different hierarchy depths need no configuration.

mod observer;

pub use observer::{from_fn, FnObserver, NoopObserver, SelectionObserver, TracingObserver};

use serde::{Deserialize, Serialize};

use crate::report::Cluster;

/// Thresholds for the deepest level.
///
/// Values are not validated: an out-of-range threshold simply selects
/// everything or nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityFilter {
    /// Largest density rank percentile kept (lower percentile = denser).
    pub max_density: f64,
    /// Smallest member count kept.
    pub min_value: i64,
}

impl Default for DensityFilter {
    fn default() -> Self {
        Self {
            max_density: 0.2,
            min_value: 5,
        }
    }
}

impl DensityFilter {
    /// Thresholds that admit every well-formed cluster.
    pub const SHOW_ALL: Self = Self {
        max_density: 1.0,
        min_value: 0,
    };

    /// Create a filter.
    pub fn new(max_density: f64, min_value: i64) -> Self {
        Self {
            max_density,
            min_value,
        }
    }

    /// Whether a deepest-level cluster passes both thresholds.
    ///
    /// A NaN percentile never passes.
    pub fn admits(&self, cluster: &Cluster) -> bool {
        cluster.density_rank_percentile <= self.max_density
            && i128::from(cluster.value) >= i128::from(self.min_value)
    }
}

/// Maximum level present, folding from 0 (so an empty list yields 0).
pub fn deepest_level(clusters: &[Cluster]) -> u32 {
    clusters.iter().fold(0, |deepest, c| deepest.max(c.level))
}

/// Select clusters for display, borrowing from the input.
///
/// Output order: all non-deepest clusters in source order, then the kept
/// deepest-level clusters in source order.
pub fn select_dense(clusters: &[Cluster], filter: DensityFilter) -> Vec<&Cluster> {
    select_dense_observed(clusters, filter, &mut NoopObserver)
}

/// [`select_dense`] reporting each step to `observer`.
pub fn select_dense_observed<'a>(
    clusters: &'a [Cluster],
    filter: DensityFilter,
    observer: &mut dyn SelectionObserver,
) -> Vec<&'a Cluster> {
    let deepest = deepest_level(clusters);
    let (deepest_clusters, mut selected): (Vec<&Cluster>, Vec<&Cluster>) =
        clusters.iter().partition(|c| c.level == deepest);

    let candidates = deepest_clusters.len();
    observer.on_start(filter, deepest, candidates);

    let mut kept = 0;
    for cluster in deepest_clusters {
        let admitted = filter.admits(cluster);
        observer.on_candidate(cluster, admitted);
        if admitted {
            selected.push(cluster);
            kept += 1;
        }
    }

    observer.on_finish(kept, candidates);
    selected
}

/// Owned variant of [`select_dense`].
pub fn dense_clusters(clusters: &[Cluster], filter: DensityFilter) -> Vec<Cluster> {
    select_dense(clusters, filter).into_iter().cloned().collect()
}

/// Owned variant of [`select_dense_observed`].
pub fn dense_clusters_observed(
    clusters: &[Cluster],
    filter: DensityFilter,
    observer: &mut dyn SelectionObserver,
) -> Vec<Cluster> {
    select_dense_observed(clusters, filter, observer)
        .into_iter()
        .cloned()
        .collect()
}
