//! Chart selection state for one report view.
//!
//! Three chart types share one report. Switching chart or editing the
//! density thresholds re-runs the selector synchronously:
//!
//! ```text
//!                 select_chart(ScatterDensity)
//!   ScatterAll ─────────────────────────────────▶ ScatterDensity
//!      ▲  │                                          │   ▲
//!      │  │ select_chart(Treemap)                    │   │ set_density_filter
//!      │  ▼                                          │   └─ (re-selects)
//!    Treemap ◀───────────────────────────────────────┘
//!
//!   ScatterAll, Treemap  → thresholds (1.0, 0)      every cluster shown
//!   ScatterDensity       → configured thresholds    dense leaves only
//! ```

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ViewConfig;
use crate::error::{Error, Result};
use crate::hierarchy::{build_treemap, scatter_series, ClusterIndex, ScatterSeries, TreemapNode};
use crate::report::{Cluster, Report};
use crate::select::{
    deepest_level, dense_clusters_observed, DensityFilter, NoopObserver, SelectionObserver,
};

/// The chart types a report view can show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartType {
    /// Scatter plot of every top-level cluster.
    #[default]
    ScatterAll,
    /// Scatter plot of dense deepest-level clusters.
    ScatterDensity,
    /// Treemap of the whole hierarchy.
    Treemap,
}

impl ChartType {
    /// Every chart type.
    pub const ALL: [ChartType; 3] = [Self::ScatterAll, Self::ScatterDensity, Self::Treemap];

    /// Wire name, e.g. `scatterAll`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ScatterAll => "scatterAll",
            Self::ScatterDensity => "scatterDensity",
            Self::Treemap => "treemap",
        }
    }

    /// Thresholds this chart selects with, given the configured ones.
    pub fn effective_filter(&self, configured: DensityFilter) -> DensityFilter {
        match self {
            Self::ScatterDensity => configured,
            Self::ScatterAll | Self::Treemap => DensityFilter::SHOW_ALL,
        }
    }

    /// Level plotted by the scatter charts.
    pub fn scatter_level(&self, deepest_level: u32) -> u32 {
        match self {
            Self::ScatterDensity => deepest_level,
            Self::ScatterAll | Self::Treemap => 1,
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::InvalidParameter {
                name: "chart",
                message: format!("unknown chart type '{s}'"),
            })
    }
}

/// State of one report view.
pub struct ViewState {
    report: Report,
    chart: ChartType,
    filter: DensityFilter,
    displayed: Vec<Cluster>,
    observer: Box<dyn SelectionObserver>,
}

impl fmt::Debug for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewState")
            .field("chart", &self.chart)
            .field("filter", &self.filter)
            .field("clusters", &self.report.clusters.len())
            .field("displayed", &self.displayed.len())
            .finish()
    }
}

impl ViewState {
    /// Open a view on `report`: scatter of all clusters, default thresholds,
    /// every cluster displayed.
    pub fn new(report: Report) -> Self {
        let displayed = report.clusters.clone();
        Self {
            report,
            chart: ChartType::default(),
            filter: DensityFilter::default(),
            displayed,
            observer: Box::new(NoopObserver),
        }
    }

    /// Open a view with the configured chart and thresholds.
    pub fn with_config(report: Report, config: &ViewConfig) -> Self {
        let mut view = Self::new(report);
        view.filter = config.density;
        view.select_chart(config.chart);
        view
    }

    /// Route selector diagnostics to `observer`.
    pub fn with_observer(mut self, observer: Box<dyn SelectionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Switch chart and re-select.
    pub fn select_chart(&mut self, chart: ChartType) {
        tracing::debug!(from = %self.chart, to = %chart, "chart selected");
        self.chart = chart;
        self.refresh();
    }

    /// Store new thresholds. The displayed clusters change only while the
    /// density scatter is shown.
    pub fn set_density_filter(&mut self, filter: DensityFilter) {
        tracing::debug!(
            max_density = filter.max_density,
            min_value = filter.min_value,
            chart = %self.chart,
            "density filter changed"
        );
        self.filter = filter;
        if self.chart == ChartType::ScatterDensity {
            self.refresh();
        }
    }

    fn refresh(&mut self) {
        let filter = self.chart.effective_filter(self.filter);
        self.displayed =
            dense_clusters_observed(&self.report.clusters, filter, self.observer.as_mut());
        tracing::debug!(
            chart = %self.chart,
            displayed = self.displayed.len(),
            total = self.report.clusters.len(),
            "displayed clusters updated"
        );
    }

    /// Selected chart.
    pub fn chart(&self) -> ChartType {
        self.chart
    }

    /// Configured thresholds (used by the density scatter).
    pub fn density_filter(&self) -> DensityFilter {
        self.filter
    }

    /// The full report.
    pub fn report(&self) -> &Report {
        &self.report
    }

    /// Clusters currently displayed.
    pub fn displayed_clusters(&self) -> &[Cluster] {
        &self.displayed
    }

    /// The report as currently displayed.
    pub fn displayed(&self) -> DisplayedReport<'_> {
        DisplayedReport {
            report: &self.report,
            clusters: &self.displayed,
            chart: self.chart,
        }
    }

    /// Give the report back.
    pub fn into_report(self) -> Report {
        self.report
    }
}

/// A report paired with its displayed clusters.
#[derive(Debug, Clone, Copy)]
pub struct DisplayedReport<'a> {
    /// The full report (arguments, config).
    pub report: &'a Report,
    /// Displayed clusters.
    pub clusters: &'a [Cluster],
    /// Chart the clusters were selected for.
    pub chart: ChartType,
}

impl<'a> DisplayedReport<'a> {
    /// Index over the displayed clusters.
    pub fn index(&self) -> ClusterIndex<'a> {
        ClusterIndex::build(self.clusters)
    }

    /// Scatter series for the selected chart's level.
    ///
    /// The density scatter plots the report's deepest level even when the
    /// thresholds left nothing displayed there.
    pub fn scatter(&self) -> Vec<ScatterSeries> {
        let level = self.chart.scatter_level(deepest_level(&self.report.clusters));
        self.scatter_at(level)
    }

    /// Scatter series for an explicit level.
    pub fn scatter_at(&self, level: u32) -> Vec<ScatterSeries> {
        scatter_series(self.clusters, &self.report.arguments, level)
    }

    /// Treemap over the displayed clusters.
    pub fn treemap(&self) -> TreemapNode {
        build_treemap(&self.index())
    }
}
