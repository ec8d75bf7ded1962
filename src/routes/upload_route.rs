use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::config::AppState;
use crate::handlers::upload_handler::*;
use crate::middleware::rate_limiter::rate_limit_middleware;

/// Room for multipart framing and the text fields on top of the file itself.
const BODY_LIMIT_SLACK: usize = 1024 * 1024;

pub fn upload_routes(state: AppState) -> Router<AppState> {
    let body_limit = state.policy.max_file_size.saturating_add(BODY_LIMIT_SLACK);

    let create = post(create_upload_handler)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn_with_state(state, rate_limit_middleware));

    Router::new()
        .route("/", create.get(list_uploads_handler))
        .route("/{id}", get(get_upload_handler))
        .route("/{id}/download", get(download_upload_handler))
}
