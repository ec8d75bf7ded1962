use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use pov_gallery::config::{AppState, Config};
use pov_gallery::middleware::rate_limiter::RateLimiter;
use pov_gallery::repositories::upload_repository::SeaOrmUploadRepository;
use pov_gallery::services::media_fetcher::MediaFetcher;
use pov_gallery::services::s3_service::S3Service;
use sea_orm::Database;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = Config::from_env().expect("Invalid configuration");
    tracing::info!("Starting pov-gallery...");

    // 1. Database Connection
    let db = Database::connect(&cfg.database_url)
        .await
        .expect("Failed to connect to Database!");
    tracing::info!("Database connected");

    // 2. Object storage
    let s3_service = S3Service::new(&cfg).await;
    tracing::info!(bucket = %cfg.s3_bucket_name, endpoint = %cfg.s3_endpoint, "Object storage configured");

    // 3. Build App State
    let state = AppState {
        storage: Arc::new(s3_service),
        uploads: Arc::new(SeaOrmUploadRepository::new(db)),
        media_fetcher: MediaFetcher::default(),
        policy: cfg.upload_policy(),
        rate_limiter: Arc::new(RateLimiter::new(cfg.rate_limit_max_requests, cfg.rate_limit_window)),
    };

    // 4. Start Server
    let app = pov_gallery::app(state);
    let addr: SocketAddr = format!("{}:{}", cfg.server_host, cfg.server_port)
        .parse()
        .expect("Invalid address");

    let listener = tokio::net::TcpListener::bind(addr).await.expect("Failed to bind");
    tracing::info!("Server ready! Listening on http://{}", addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
