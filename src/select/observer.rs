//! Diagnostic hooks for dense-cluster selection.
//!
//! The selector itself is silent. Callers that want a trace of what was
//! considered and what was dropped pass an observer.

use super::DensityFilter;
use crate::report::Cluster;

/// Receives the steps of a selection run.
///
/// Every method has an empty default so observers implement only what they
/// need.
pub trait SelectionObserver {
    /// Called once before any deepest-level cluster is examined.
    fn on_start(&mut self, _filter: DensityFilter, _deepest_level: u32, _candidates: usize) {}

    /// Called for each deepest-level cluster with the verdict.
    fn on_candidate(&mut self, _cluster: &Cluster, _kept: bool) {}

    /// Called once after selection.
    fn on_finish(&mut self, _kept: usize, _candidates: usize) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SelectionObserver for NoopObserver {}

/// Observer that emits `tracing` events.
///
/// Summary lines go out at `debug`, per-cluster lines at `trace`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SelectionObserver for TracingObserver {
    fn on_start(&mut self, filter: DensityFilter, deepest_level: u32, candidates: usize) {
        tracing::debug!(
            max_density = filter.max_density,
            min_value = filter.min_value,
            deepest_level,
            candidates,
            "dense cluster selection started"
        );
    }

    fn on_candidate(&mut self, cluster: &Cluster, kept: bool) {
        tracing::trace!(
            id = %cluster.id,
            label = %cluster.label,
            density = cluster.density_rank_percentile,
            value = cluster.value,
            kept,
            "deepest-level cluster"
        );
    }

    fn on_finish(&mut self, kept: usize, candidates: usize) {
        tracing::debug!(kept, candidates, "dense cluster selection finished");
    }
}

/// Observer built from a per-candidate closure.
#[derive(Clone)]
pub struct FnObserver<F> {
    f: F,
}

impl<F> FnObserver<F> {
    /// Create an observer from a function.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> SelectionObserver for FnObserver<F>
where
    F: FnMut(&Cluster, bool),
{
    fn on_candidate(&mut self, cluster: &Cluster, kept: bool) {
        (self.f)(cluster, kept)
    }
}

/// Create an observer from a closure called for every deepest-level cluster.
pub fn from_fn<F>(f: F) -> FnObserver<F>
where
    F: FnMut(&Cluster, bool),
{
    FnObserver::new(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::select_dense_observed;

    #[derive(Default)]
    struct Recorder {
        started: Option<(u32, usize)>,
        verdicts: Vec<(String, bool)>,
        finished: Option<(usize, usize)>,
    }

    impl SelectionObserver for Recorder {
        fn on_start(&mut self, _filter: DensityFilter, deepest_level: u32, candidates: usize) {
            self.started = Some((deepest_level, candidates));
        }

        fn on_candidate(&mut self, cluster: &Cluster, kept: bool) {
            self.verdicts.push((cluster.id.clone(), kept));
        }

        fn on_finish(&mut self, kept: usize, candidates: usize) {
            self.finished = Some((kept, candidates));
        }
    }

    fn clusters() -> Vec<Cluster> {
        vec![
            Cluster::new("1_0", 1, 30, 0.4),
            Cluster::new("2_0", 2, 10, 0.1).with_parent("1_0"),
            Cluster::new("2_1", 2, 10, 0.9).with_parent("1_0"),
        ]
    }

    #[test]
    fn observer_sees_every_deepest_candidate() {
        let clusters = clusters();
        let mut rec = Recorder::default();
        let out = select_dense_observed(&clusters, DensityFilter::default(), &mut rec);

        assert_eq!(out.len(), 2);
        assert_eq!(rec.started, Some((2, 2)));
        assert_eq!(
            rec.verdicts,
            vec![("2_0".to_string(), true), ("2_1".to_string(), false)]
        );
        assert_eq!(rec.finished, Some((1, 2)));
    }

    #[test]
    fn fn_observer_counts_drops() {
        let clusters = clusters();
        let mut dropped = 0;
        let mut obs = from_fn(|_: &Cluster, kept| {
            if !kept {
                dropped += 1;
            }
        });
        let _ = select_dense_observed(&clusters, DensityFilter::default(), &mut obs);
        drop(obs);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn observers_do_not_change_the_result() {
        let clusters = clusters();
        let silent = select_dense_observed(&clusters, DensityFilter::default(), &mut NoopObserver);
        let traced =
            select_dense_observed(&clusters, DensityFilter::default(), &mut TracingObserver);
        assert_eq!(silent, traced);
    }
}
