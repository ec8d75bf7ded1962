use axum::http::Method;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppState;
use crate::handlers::health_check_handler;

pub mod upload_route;

pub fn create_routes(state: AppState) -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/uploads", upload_route::upload_routes(state))
        .route("/api/health", get(health_check_handler))
        .layer(cors)
}
