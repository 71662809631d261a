//! MoviCare API Server binary.

use std::net::SocketAddr;

use api_server::{config::Config, create_app, create_state, init_tracing, services::seed};
use clinic_store::MemoryClinicStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    tracing::info!("Starting MoviCare API Server");

    // Create clinic store
    // TODO: Select a database-backed store from config.database_url
    let store = MemoryClinicStore::new();

    // Seed demo data if requested
    if config.seed_demo_data {
        seed::seed_demo_data(&store).await?;
    }

    // Create application state
    let state = create_state(config.clone(), store);

    // Create application router
    let app = create_app(state);

    // Parse server address
    let addr: SocketAddr = config.server_addr().parse()?;

    tracing::info!(addr = %addr, "Server listening");

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
