use tracing_subscriber::EnvFilter;

use carchase_host::config::HostConfig;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = HostConfig::load();
    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Refusing to start");
        std::process::exit(1);
    }

    tracing::info!("Car Chase host starting");
    let report = carchase_host::run(config).await;

    tracing::info!(
        runs = report.runs.len(),
        best = ?report.best_score(),
        personal_best = ?report.personal_best,
        frames = report.recorder.frames(),
        "Car Chase host finished"
    );
}

/// `CARCHASE_LOG_JSON=1` switches to JSON lines for log shippers.
fn init_tracing() {
    let json = std::env::var("CARCHASE_LOG_JSON").is_ok_and(|v| v == "1");
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    }
}
