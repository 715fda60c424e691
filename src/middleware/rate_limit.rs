// src/middleware/rate_limit.rs
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Fixed-window request counter keyed by client.
pub struct RateLimiter {
    requests: RwLock<HashMap<String, RateLimitEntry>>,
    max_requests: usize,
    window: Duration,
    trust_proxy_headers: bool,
}

struct RateLimitEntry {
    count: usize,
    window_start: Instant,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            requests: RwLock::new(HashMap::new()),
            max_requests,
            window,
            trust_proxy_headers: false,
        }
    }

    /// Key clients by `X-Forwarded-For` / `X-Real-IP` instead of the peer
    /// address. Only safe behind a proxy that sets those headers.
    pub fn trust_proxy_headers(mut self, trust: bool) -> Self {
        self.trust_proxy_headers = trust;
        self
    }

    /// Count one request for `key`; false once the window is exhausted.
    pub async fn check(&self, key: &str) -> bool {
        let mut requests = self.requests.write().await;
        let now = Instant::now();

        let entry = requests
            .entry(key.to_string())
            .or_insert_with(|| RateLimitEntry {
                count: 0,
                window_start: now,
            });

        if now.duration_since(entry.window_start) > self.window {
            entry.count = 0;
            entry.window_start = now;
        }

        if entry.count >= self.max_requests {
            return false;
        }

        entry.count += 1;
        true
    }

    /// Drop entries whose window has expired.
    pub async fn cleanup(&self) {
        let mut requests = self.requests.write().await;
        let now = Instant::now();

        requests.retain(|_, entry| now.duration_since(entry.window_start) <= self.window);
    }

    pub async fn tracked_clients(&self) -> usize {
        self.requests.read().await.len()
    }
}

/// Client identifier: proxy headers when trusted, else the peer address.
fn client_id(request: &Request, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers {
        if let Some(id) = forwarded_client(request.headers()) {
            return id;
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn forwarded_client(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded) = headers.get("x-forwarded-for") {
        if let Ok(forwarded_str) = forwarded.to_str() {
            if let Some(ip) = forwarded_str.split(',').next() {
                return Some(ip.trim().to_string());
            }
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|real_ip| real_ip.to_str().ok())
        .map(|ip| ip.trim().to_string())
}

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let client_id = client_id(&request, limiter.trust_proxy_headers);

    if limiter.check(&client_id).await {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(
            "Rate limit exceeded for client: {} on path: {}",
            client_id,
            request.uri().path()
        );
        Err(StatusCode::TOO_MANY_REQUESTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[tokio::test]
    async fn test_rate_limiting() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60));

        for _ in 0..5 {
            assert!(limiter.check("test_client").await);
        }
        assert!(!limiter.check("test_client").await);
        assert!(limiter.check("other_client").await);
    }

    #[tokio::test]
    async fn test_window_reset_and_cleanup() {
        let limiter = RateLimiter::new(1, Duration::from_millis(50));

        assert!(limiter.check("test").await);
        assert!(!limiter.check("test").await);

        tokio::time::sleep(Duration::from_millis(80)).await;
        limiter.cleanup().await;
        assert_eq!(limiter.tracked_clients().await, 0);
        assert!(limiter.check("test").await);
    }

    fn request_from(peer: Option<&str>, headers: &[(&str, &str)]) -> Request {
        let mut builder = axum::http::Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let mut request = builder.body(Body::empty()).unwrap();
        if let Some(peer) = peer {
            let addr: SocketAddr = peer.parse().unwrap();
            request.extensions_mut().insert(ConnectInfo(addr));
        }
        request
    }

    #[test]
    fn test_client_id_uses_peer_address() {
        assert_eq!(client_id(&request_from(None, &[]), false), "unknown");
        assert_eq!(client_id(&request_from(Some("198.51.100.7:52100"), &[]), false), "198.51.100.7");
    }

    #[test]
    fn test_untrusted_forwarded_headers_are_ignored() {
        let request = request_from(
            Some("198.51.100.7:52100"),
            &[("x-forwarded-for", "203.0.113.4"), ("x-real-ip", "10.0.0.9")],
        );
        assert_eq!(client_id(&request, false), "198.51.100.7");
    }

    #[test]
    fn test_trusted_proxy_headers() {
        let request = request_from(Some("10.0.0.1:443"), &[("x-real-ip", "10.0.0.9")]);
        assert_eq!(client_id(&request, true), "10.0.0.9");

        let request = request_from(
            Some("10.0.0.1:443"),
            &[("x-forwarded-for", "203.0.113.4, 10.0.0.1"), ("x-real-ip", "10.0.0.9")],
        );
        assert_eq!(client_id(&request, true), "203.0.113.4");

        let request = request_from(Some("10.0.0.1:443"), &[]);
        assert_eq!(client_id(&request, true), "10.0.0.1");
    }
}
