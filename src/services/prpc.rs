// src/services/prpc.rs
//
// pRPC client. `fetch_nodes` always hands back something usable: the live
// list, or the injected fallback directory when the upstream call fails.
use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::Node;

/// Object keys that may wrap the node array, checked in order.
const LIST_KEYS: [&str; 3] = ["result", "nodes", "pnodes"];

#[derive(Debug, Error)]
pub enum PrpcError {
    #[error("network error: {0}")]
    Network(String),
    #[error("upstream returned HTTP {0}")]
    Status(u16),
    #[error("invalid response body: {0}")]
    Parse(String),
    #[error("response is not a recognized node list shape")]
    UnrecognizedShape,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` and decode the body as JSON.
    async fn get_json(&self, url: &str) -> Result<Value, PrpcError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &str) -> Result<Value, PrpcError> {
        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| PrpcError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PrpcError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| PrpcError::Parse(e.to_string()))
    }
}

#[derive(Clone)]
pub struct PrpcClient {
    endpoint: String,
    transport: Arc<dyn Transport>,
    fallback: Arc<Vec<Node>>,
}

impl PrpcClient {
    pub fn new(endpoint: &str, transport: Arc<dyn Transport>, fallback: Arc<Vec<Node>>) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            transport,
            fallback,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn fallback(&self) -> &[Node] {
        &self.fallback
    }

    /// Fetch the node list, never failing.
    ///
    /// An unrecognized response shape yields an empty list; every other
    /// failure yields the fallback directory.
    pub async fn fetch_nodes(&self) -> Vec<Node> {
        match self.try_fetch_nodes().await {
            Ok(nodes) => nodes,
            Err(PrpcError::UnrecognizedShape) => {
                warn!("pRPC response from {} has no node list, treating as empty", self.endpoint);
                Vec::new()
            }
            Err(e) => {
                warn!("Error fetching pNodes from {}: {}, serving fallback directory", self.endpoint, e);
                self.fallback.to_vec()
            }
        }
    }

    /// Fetch the node list, surfacing each failure kind.
    pub async fn try_fetch_nodes(&self) -> Result<Vec<Node>, PrpcError> {
        let url = format!("{}/pnodes", self.endpoint);
        let body = self.transport.get_json(&url).await?;
        extract_node_list(body)
    }

    /// Look up one node by pubkey; any failure is `None`.
    pub async fn fetch_node_by_pubkey(&self, pubkey: &str) -> Option<Node> {
        let url = format!("{}/pnode/{}", self.endpoint, urlencoding::encode(pubkey));

        let body = match self.transport.get_json(&url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Error fetching pNode {}: {}", pubkey, e);
                return None;
            }
        };

        match serde_json::from_value::<Node>(unwrap_single(body)) {
            Ok(node) => Some(node),
            Err(e) => {
                warn!("Invalid pNode payload for {}: {}", pubkey, e);
                None
            }
        }
    }
}

/// Accept a bare array or an object wrapping one under a known key.
/// Entries that do not decode as a node are skipped, but a non-empty list
/// with no decodable entry is a parse error.
pub fn extract_node_list(body: Value) -> Result<Vec<Node>, PrpcError> {
    let entries = match body {
        Value::Array(entries) => entries,
        Value::Object(mut map) => LIST_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(entries)) => Some(entries),
                _ => None,
            })
            .ok_or(PrpcError::UnrecognizedShape)?,
        _ => return Err(PrpcError::UnrecognizedShape),
    };

    let total = entries.len();
    let nodes: Vec<Node> = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<Node>(entry) {
            Ok(node) => Some(node),
            Err(e) => {
                debug!("Skipping malformed pNode entry: {}", e);
                None
            }
        })
        .collect();

    if total > 0 && nodes.is_empty() {
        return Err(PrpcError::Parse(format!(
            "none of {} pNode entries could be decoded",
            total
        )));
    }
    if nodes.len() < total {
        warn!("Skipped {} of {} malformed pNode entries", total - nodes.len(), total);
    }

    Ok(nodes)
}

fn unwrap_single(body: Value) -> Value {
    for key in ["result", "pnode"] {
        if let Some(inner) = body.get(key) {
            if !inner.is_null() {
                return inner.clone();
            }
        }
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct FailingTransport;

    #[async_trait]
    impl Transport for FailingTransport {
        async fn get_json(&self, _url: &str) -> Result<Value, PrpcError> {
            Err(PrpcError::Network("connection refused".into()))
        }
    }

    struct CannedTransport {
        body: Value,
        requested: Mutex<Vec<String>>,
    }

    impl CannedTransport {
        fn new(body: Value) -> Self {
            Self {
                body,
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn get_json(&self, url: &str) -> Result<Value, PrpcError> {
            self.requested.lock().unwrap().push(url.to_string());
            Ok(self.body.clone())
        }
    }

    fn fallback() -> Arc<Vec<Node>> {
        Arc::new(vec![Node::bare("fallback-1", "pk-fallback-1")])
    }

    #[tokio::test]
    async fn test_transport_failure_serves_fallback() {
        let client = PrpcClient::new("http://prpc.test", Arc::new(FailingTransport), fallback());
        let nodes = client.fetch_nodes().await;

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id, "fallback-1");
    }

    #[tokio::test]
    async fn test_accepts_each_list_shape() {
        let node = json!({"id": "n1", "pubkey": "pk1", "status": "online"});
        for body in [
            json!([node.clone()]),
            json!({"result": [node.clone()]}),
            json!({"nodes": [node.clone()]}),
            json!({"pnodes": [node.clone()]}),
        ] {
            let client = PrpcClient::new("http://prpc.test", Arc::new(CannedTransport::new(body)), fallback());
            let nodes = client.fetch_nodes().await;
            assert_eq!(nodes.len(), 1);
            assert_eq!(nodes[0].id, "n1");
        }
    }

    #[tokio::test]
    async fn test_unrecognized_shape_is_empty_not_fallback() {
        let body = json!({"Nodes": [{"id": "n1", "pubkey": "pk1"}]});
        let client = PrpcClient::new("http://prpc.test", Arc::new(CannedTransport::new(body.clone())), fallback());

        assert!(client.fetch_nodes().await.is_empty());
        assert!(matches!(
            extract_node_list(body),
            Err(PrpcError::UnrecognizedShape)
        ));
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let nodes = extract_node_list(json!([
            {"id": "n1", "pubkey": "pk1"},
            {"id": "missing-pubkey"},
            {"id": "n2", "pubkey": "pk2", "uptime": 98.5}
        ]))
        .unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].uptime, Some(98.5));
    }

    #[tokio::test]
    async fn test_all_malformed_entries_serve_fallback() {
        let body = json!([{"id": "a", "pubKey": "k"}]);
        assert!(matches!(extract_node_list(body.clone()), Err(PrpcError::Parse(_))));

        let client = PrpcClient::new("http://prpc.test", Arc::new(CannedTransport::new(body)), fallback());
        let nodes = client.fetch_nodes().await;
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id, "fallback-1");
    }

    #[test]
    fn test_empty_list_is_not_an_error() {
        assert!(extract_node_list(json!({"result": []})).unwrap().is_empty());
    }

    #[test]
    fn test_fractional_numbers_keep_entry() {
        let nodes = extract_node_list(json!([
            {"id": "n1", "pubkey": "pk1", "lastSeen": 1700000000000.5_f64},
            {"id": "n2", "pubkey": "pk2", "port": 8899.0_f64}
        ]))
        .unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].last_seen, Some(1_700_000_000_000));
        assert_eq!(nodes[1].port, Some(8899));
    }

    #[tokio::test]
    async fn test_fetch_node_by_pubkey_unwraps_result() {
        let transport = Arc::new(CannedTransport::new(
            json!({"result": {"id": "n1", "pubkey": "pk/1"}}),
        ));
        let client = PrpcClient::new("http://prpc.test/", transport.clone(), fallback());

        let node = client.fetch_node_by_pubkey("pk/1").await.unwrap();
        assert_eq!(node.id, "n1");
        assert_eq!(
            transport.requested.lock().unwrap().as_slice(),
            ["http://prpc.test/pnode/pk%2F1"]
        );
    }

    #[tokio::test]
    async fn test_fetch_node_by_pubkey_failure_is_none() {
        let client = PrpcClient::new("http://prpc.test", Arc::new(FailingTransport), fallback());
        assert!(client.fetch_node_by_pubkey("pk1").await.is_none());

        let client = PrpcClient::new(
            "http://prpc.test",
            Arc::new(CannedTransport::new(json!({"error": "not found"}))),
            fallback(),
        );
        assert!(client.fetch_node_by_pubkey("pk1").await.is_none());
    }

    mod http {
        use super::*;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        fn client(server: &MockServer) -> PrpcClient {
            let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
            PrpcClient::new(&server.uri(), Arc::new(transport), fallback())
        }

        #[tokio::test]
        async fn test_live_list_is_returned() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/pnodes"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "result": [{"id": "live-1", "pubkey": "pk-live-1", "storageUsed": 12.5}]
                })))
                .mount(&server)
                .await;

            let nodes = client(&server).fetch_nodes().await;
            assert_eq!(nodes.len(), 1);
            assert_eq!(nodes[0].storage_used, Some(12.5));
        }

        #[tokio::test]
        async fn test_server_error_serves_fallback() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/pnodes"))
                .respond_with(ResponseTemplate::new(503))
                .mount(&server)
                .await;

            let client = client(&server);
            assert!(matches!(client.try_fetch_nodes().await, Err(PrpcError::Status(503))));
            assert_eq!(client.fetch_nodes().await[0].id, "fallback-1");
        }

        #[tokio::test]
        async fn test_invalid_json_serves_fallback() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/pnodes"))
                .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
                .mount(&server)
                .await;

            let client = client(&server);
            assert!(matches!(client.try_fetch_nodes().await, Err(PrpcError::Parse(_))));
            assert_eq!(client.fetch_nodes().await.len(), 1);
        }
    }
}
