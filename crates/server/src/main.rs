use server::config;
use server::db;
use server::routes;

use axum::{routing::{get, post}, Extension, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env();

    tracing::info!("Connecting to database...");
    let pool = db::pool::create_pool(&config.database_url, config.max_connections)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Running migrations...");
    db::pool::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    if !config.validate_legality {
        tracing::warn!("Legality checks disabled - lines are stored as submitted");
    }

    // The board UI is served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/submit", post(routes::repertoire::submit_line))
        .route("/api/get_moves", post(routes::repertoire::get_moves))
        .route("/api/get_repertoire", post(routes::repertoire::get_repertoire))
        .route("/api/repertoires", get(routes::repertoire::list_repertoires))
        .layer(Extension(pool))
        .layer(Extension(config.clone()))
        .layer(cors);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app).await.expect("Server error");
}
