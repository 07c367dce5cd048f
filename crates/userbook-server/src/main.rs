//! # Userbook Server
//!
//! Serves the `/v1/users` REST API backed by MySQL.

use tracing::{error, info};
use userbook_config::ConfigLoader;
use userbook_core::UserbookResult;
use userbook_server::{app::Application, startup::init_logging};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Application error: {}", e);
        eprintln!("userbook-server: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> UserbookResult<()> {
    let config = ConfigLoader::from_default_location().load()?;
    init_logging(&config.observability);

    info!("Starting {} v{}", config.app.name, env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    Application::build(config).await?.run().await
}
