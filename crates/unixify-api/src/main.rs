//! Registry API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p unixify-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env` when present).

use tracing::{error, info};
use unixify_common::{try_init_tracing, try_init_tracing_with_config, AppConfig, TracingConfig};

#[tokio::main]
async fn main() {
    // The log format follows the configured environment
    let config = AppConfig::from_env();
    let init = match &config {
        Ok(config) => try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)),
        Err(_) => try_init_tracing(),
    };
    if let Err(e) = init {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        env = ?config.app.env,
        address = %config.api.address(),
        "Starting registry API server..."
    );

    unixify_api::run(config).await?;

    Ok(())
}
