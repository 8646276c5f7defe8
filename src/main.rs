use rusty_library_desk::{
    api::{handlers::AppState, router::create_router},
    application::ServiceDependencies,
    config::AppConfig,
    seed,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rusty_library_desk=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // In-memory catalog, optionally seeded with the demo books
    let books = if config.seed_catalog {
        seed::demo_catalog()
    } else {
        Vec::new()
    };
    tracing::info!(books = books.len(), "catalog loaded");

    // Create service dependencies
    let service_deps = ServiceDependencies::in_memory(books);

    // Create application state
    let app_state = Arc::new(AppState::new(service_deps));

    // Create router
    let app = create_router(app_state);

    let addr = config.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app).await?;

    Ok(())
}
