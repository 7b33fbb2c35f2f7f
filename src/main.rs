use ethicsupply_gateway::config::Config;
use ethicsupply_gateway::fallback_store::FallbackStore;
use ethicsupply_gateway::handlers::{self, AppState};
use ethicsupply_gateway::services::SupplierDataClient;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the gateway.
///
/// Initializes logging, loads configuration, seeds the fallback store, builds
/// the supplier data client and serves the axum router.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ethicsupply_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    let store = Arc::new(FallbackStore::with_demo_data());
    tracing::info!("Fallback store seeded with {} suppliers", store.len());

    let client = SupplierDataClient::new(&config, store)
        .map_err(|e| anyhow::anyhow!("Failed to initialize supplier client: {}", e))?;
    tracing::info!(
        "Supplier client initialized: {} (formula: {})",
        config.api_base_url,
        config.scoring_formula
    );

    let app_state = Arc::new(AppState {
        client,
        config: config.clone(),
    });
    let app = handlers::router(app_state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
