use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::RwLock;

use crate::config::AppState;
use crate::utils::api_response::ResponseBuilder;

/// Sliding-window limiter keyed by client address.
pub struct RateLimiter {
    requests: RwLock<HashMap<String, Vec<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            requests: RwLock::new(HashMap::new()),
            max_requests,
            window,
        }
    }

    pub async fn check_rate_limit(&self, identifier: &str) -> bool {
        self.check_at(identifier, Instant::now()).await
    }

    async fn check_at(&self, identifier: &str, now: Instant) -> bool {
        let mut requests = self.requests.write().await;
        let cutoff = now.checked_sub(self.window).unwrap_or(now);

        // Clients with nothing inside the window are dropped entirely.
        requests.retain(|_, timestamps| {
            timestamps.retain(|&timestamp| timestamp > cutoff);
            !timestamps.is_empty()
        });

        let entry = requests.entry(identifier.to_string()).or_default();
        if entry.len() >= self.max_requests {
            return false;
        }

        entry.push(now);
        true
    }

    #[cfg(test)]
    async fn tracked_clients(&self) -> usize {
        self.requests.read().await.len()
    }
}

/// First hop of `X-Forwarded-For`, then the peer address, then `unknown`.
fn client_identifier(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    match (forwarded, peer) {
        (Some(hop), _) => hop.to_string(),
        (None, Some(addr)) => addr.ip().to_string(),
        (None, None) => "unknown".to_string(),
    }
}

pub async fn rate_limit_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let identifier = client_identifier(request.headers(), peer);

    if !state.rate_limiter.check_rate_limit(&identifier).await {
        tracing::warn!(client = %identifier, "Upload rate limit exceeded");
        return ResponseBuilder::error::<()>(
            StatusCode::TOO_MANY_REQUESTS,
            "RATE_LIMIT_EXCEEDED",
            "Too many uploads. Please try again later.",
        )
        .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[tokio::test]
    async fn limit_applies_per_client_and_window() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let start = Instant::now();

        assert!(limiter.check_at("10.0.0.1", start).await);
        assert!(limiter.check_at("10.0.0.1", start).await);
        assert!(!limiter.check_at("10.0.0.1", start).await);
        assert!(limiter.check_at("10.0.0.2", start).await);

        let later = start + Duration::from_secs(61);
        assert!(limiter.check_at("10.0.0.1", later).await);
    }

    #[tokio::test]
    async fn idle_clients_are_forgotten_after_the_window() {
        let limiter = RateLimiter::new(30, Duration::from_secs(60));
        let start = Instant::now();

        for n in 0..1000 {
            assert!(limiter.check_at(&format!("198.51.100.{n}"), start).await);
        }
        assert_eq!(limiter.tracked_clients().await, 1000);

        let an_hour_later = start + Duration::from_secs(3600);
        assert!(limiter.check_at("203.0.113.9", an_hour_later).await);
        assert_eq!(limiter.tracked_clients().await, 1);
    }

    #[tokio::test]
    async fn rejected_request_is_not_counted() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();

        assert!(limiter.check_at("10.0.0.1", start).await);
        assert!(!limiter.check_at("10.0.0.1", start + Duration::from_secs(30)).await);
        assert!(limiter.check_at("10.0.0.1", start + Duration::from_secs(61)).await);
    }

    #[test]
    fn identifier_prefers_forwarded_hop_then_peer() {
        let peer: SocketAddr = "192.0.2.7:51234".parse().unwrap();
        let mut headers = HeaderMap::new();
        assert_eq!(client_identifier(&headers, None), "unknown");
        assert_eq!(client_identifier(&headers, Some(peer)), "192.0.2.7");

        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.9, 10.0.0.1"));
        assert_eq!(client_identifier(&headers, Some(peer)), "203.0.113.9");
    }
}
