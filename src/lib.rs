pub mod client;
pub mod config;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod utils;

#[cfg(test)]
mod test_utils;

use axum::Router;

use crate::config::AppState;

pub fn app(state: AppState) -> Router {
    routes::create_routes(state.clone()).with_state(state)
}
