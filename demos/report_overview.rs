use canopy::{
    ChartType, DensityFilter, HealthCheck, Report, TracingObserver, ViewState,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=canopy=trace shows every deepest-level verdict.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "fixtures/hierarchical_result.json".to_string());
    let report = Report::from_path(&path)?;

    let stats = report.stats();
    println!("question: {}", report.config.question);
    println!(
        "comments={} arguments={} levels={:?}",
        stats.comment_num, stats.argument_num, stats.level_counts
    );

    let health = report.health_check();
    if !health.is_healthy() {
        eprintln!("{}", health);
    }

    let mut view = ViewState::new(report).with_observer(Box::new(TracingObserver));
    view.set_density_filter(DensityFilter::default());
    view.select_chart(ChartType::ScatterDensity);

    println!("dense clusters ({}):", view.chart());
    for series in view.displayed().scatter() {
        let center = series
            .center()
            .map(|(x, y)| format!("({x:.2}, {y:.2})"))
            .unwrap_or_else(|| "-".to_string());
        println!("  {} [{}] {} points, center {}", series.label, series.cluster_id, series.len(), center);
    }

    view.select_chart(ChartType::Treemap);
    let tree = view.displayed().treemap();
    println!("treemap root: {}", tree);
    for child in &tree.children {
        println!("  {}", child);
        for leaf in &child.children {
            println!("    {}", leaf);
        }
    }

    Ok(())
}
