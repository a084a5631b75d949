use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imposter::{
    app::AppState,
    broadcast,
    catalog::{RoleCatalog, StaticCatalog},
    config::AppConfig,
    state::Session,
    ws,
};

/// Catalog from the configured file, or the built-in words
fn load_catalog(config: &AppConfig) -> StaticCatalog {
    let Some(path) = &config.catalog_path else {
        tracing::info!("No CATALOG_PATH set, using built-in words");
        return StaticCatalog::builtin();
    };

    match StaticCatalog::from_path(path) {
        Ok(catalog) => {
            tracing::info!(
                "Loaded {} categories from {}",
                catalog.categories.len(),
                path.display()
            );
            catalog
        }
        Err(e) => {
            tracing::error!(
                "Failed to load catalog from {}: {}. Using built-in words.",
                path.display(),
                e
            );
            StaticCatalog::builtin()
        }
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imposter=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting imposter...");

    let config = AppConfig::from_env();
    let catalog: Arc<dyn RoleCatalog> = Arc::new(load_catalog(&config));
    let session = Session::new(catalog, config.engine.clone());
    let state = Arc::new(AppState::new(session));

    // Auto-advance from PLAYING to VOTING when the discussion timer runs out
    broadcast::spawn_discussion_timer_watcher(state.clone());

    let app = Router::new()
        .route("/ws", get(ws::ws_handler))
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("Listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await
}
