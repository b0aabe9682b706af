use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use webtrail::{
    api,
    config::{Settings, StoredConfig},
    db::HistoryRepo,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    let stored = StoredConfig::load(&settings.config_file());

    // Resolve the data source: explicit URL, explicit path, the persisted
    // choice, then a fresh default under the data directory.
    let repo = if let Some(url) = settings.database_url.clone() {
        HistoryRepo::connect(&url).await?
    } else {
        let path = settings
            .database_path
            .clone()
            .or_else(|| stored.db_path.clone())
            .unwrap_or_else(|| settings.default_db_path().to_string_lossy().into_owned());
        std::fs::create_dir_all(&settings.data_dir)?;
        HistoryRepo::open(&path).await?
    };
    info!("History database ready at {}", repo.source());

    // Create app state
    let state = AppState::new(repo, settings.clone());

    // CORS layer
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(Any);

    // Build router
    let app = Router::new()
        .route("/", get(api::root))
        .route("/api/list_history", post(api::list_history))
        .route("/api/stats_overview", get(api::stats_overview))
        .route("/api/get_config", get(api::get_config))
        .route("/api/set_db_path", post(api::set_db_path))
        .route("/api/validate_db_path", post(api::validate_db_path))
        // Static files (frontend)
        .nest_service("/static", ServeDir::new(&settings.static_dir))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::new(
        settings.host.parse().unwrap_or([127, 0, 0, 1].into()),
        settings.port,
    );
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
