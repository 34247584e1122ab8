//! Cylinder Cost Estimator - Main Entry Point
//!
//! Serves the cost predictor page on the configured address.

use anyhow::Result;
use cylinder_cost_estimator::config::{AppConfig, LogFormat, LoggingConfig};
use cylinder_cost_estimator::server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logging needs the config, so load it first
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    info!("Starting Cylinder Cost Estimator");
    info!(
        models_dir = %config.models.models_dir,
        onnx_threads = config.models.onnx_threads,
        "Configuration loaded successfully"
    );

    server::start_server(config).await?;

    info!("Cost estimator shutting down...");
    Ok(())
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("cylinder_cost_estimator={}", logging.level).parse()?)
        .add_directive(format!("tower_http={}", logging.level).parse()?);

    match logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    Ok(())
}
