use qa_search_backend::{
    api::{build_router, AppState},
    config::Config,
    search::SearchService,
    store::{InMemoryStore, PlatformStore},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.observability.log_filter));
    if config.observability.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting Q&A search backend v{}", env!("CARGO_PKG_VERSION"));

    // Initialize storage backend
    let store: Arc<dyn PlatformStore> = Arc::new(InMemoryStore::new());
    tracing::info!("✅ Storage backend initialized");

    // Initialize search service
    let search = Arc::new(SearchService::new(store.clone(), &config.search));
    tracing::info!("✅ Search service initialized");

    // Build and serve the HTTP API
    let state = AppState::new(store, search);
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
