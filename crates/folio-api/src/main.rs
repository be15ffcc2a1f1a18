//! Folio API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p folio-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use folio_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Server failed");
        eprintln!("folio-api: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.server.address(),
        store = ?config.store.backend,
        redis = config.redis.is_some(),
        "Configuration loaded"
    );

    folio_api::run(config).await?;
    Ok(())
}
