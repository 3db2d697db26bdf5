use std::io;
use std::sync::Arc;
use traffic_dashboard::config::DashboardConfig;
use traffic_dashboard::dashboard::cli::run_cli;
use traffic_dashboard::dashboard::TrafficLightsSession;
use traffic_dashboard::data_access::{FileDataSource, MockDataSource, TrafficDataSource};

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match DashboardConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return;
        }
    };

    let source: Arc<dyn TrafficDataSource> =
        match (&config.intersections_file, &config.violations_file) {
            (Some(intersections), Some(violations)) => {
                let source =
                    FileDataSource::new(intersections, violations, config.summary_window_secs());
                Arc::new(match &config.cameras_file {
                    Some(cameras) => source.with_cameras(cameras),
                    None => source,
                })
            }
            _ => Arc::new(
                MockDataSource::new()
                    .with_jitter(true)
                    .with_summary_window(config.summary_window_secs()),
            ),
        };

    println!("Starting traffic dashboard...");
    let mut session = TrafficLightsSession::new(source, &config);
    if let Err(e) = session.load().await {
        eprintln!("{}", e);
    }
    session.set_auto_refresh(config.auto_refresh);

    match run_cli(&mut session, config.rows_per_page).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {}
        Err(e) => eprintln!("CLI error: {}", e),
    }
    session.shutdown();
}
