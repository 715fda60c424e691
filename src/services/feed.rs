// src/services/feed.rs
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info};

use crate::models::Node;
use crate::services::prpc::PrpcClient;
use crate::services::simulation::Simulator;

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub nodes: Vec<Node>,
    pub last_updated: DateTime<Utc>,
}

/// The node list the pages render from. Each poll replaces the list
/// wholesale, so overlapping ticks cannot interleave partial updates.
#[derive(Clone)]
pub struct NodeFeed {
    client: PrpcClient,
    snapshot: Arc<RwLock<Snapshot>>,
}

impl NodeFeed {
    pub fn new(client: PrpcClient) -> Self {
        Self {
            client,
            snapshot: Arc::new(RwLock::new(Snapshot {
                nodes: Vec::new(),
                last_updated: Utc::now(),
            })),
        }
    }

    pub fn client(&self) -> &PrpcClient {
        &self.client
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }

    pub async fn nodes(&self) -> Vec<Node> {
        self.snapshot.read().await.nodes.clone()
    }

    /// Find a node in the current snapshot by id or pubkey.
    pub async fn find(&self, key: &str) -> Option<Node> {
        self.snapshot
            .read()
            .await
            .nodes
            .iter()
            .find(|n| n.id == key || n.pubkey == key)
            .cloned()
    }

    /// Fetch and replace the node list. Returns the new node count.
    pub async fn refresh(&self) -> usize {
        let nodes = self.client.fetch_nodes().await;
        let count = nodes.len();

        let mut snapshot = self.snapshot.write().await;
        snapshot.nodes = nodes;
        snapshot.last_updated = Utc::now();
        count
    }

    /// Apply one round of simulated drift to every node.
    pub async fn simulate(&self, simulator: &dyn Simulator) {
        let mut snapshot = self.snapshot.write().await;
        let drifted = snapshot.nodes.iter().map(|n| simulator.perturb(n)).collect();
        snapshot.nodes = drifted;
        snapshot.last_updated = Utc::now();
    }

    /// Start the background timers. They run until the handle is dropped.
    pub fn spawn(
        &self,
        poll_interval: Duration,
        simulation: Option<(Arc<dyn Simulator>, Duration)>,
    ) -> FeedHandle {
        let mut tasks = Vec::new();

        let feed = self.clone();
        tasks.push(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + poll_interval, poll_interval);
            info!("Node feed polling every {}s", poll_interval.as_secs());
            loop {
                interval.tick().await;
                let count = feed.refresh().await;
                debug!("Node feed refreshed, {} nodes", count);
            }
        }));

        if let Some((simulator, period)) = simulation {
            let feed = self.clone();
            tasks.push(tokio::spawn(async move {
                let mut interval = time::interval_at(Instant::now() + period, period);
                info!("Telemetry simulation enabled, ticking every {}ms", period.as_millis());
                loop {
                    interval.tick().await;
                    feed.simulate(simulator.as_ref()).await;
                }
            }));
        }

        FeedHandle { tasks }
    }
}

/// Owns the feed's timers; dropping it cancels them.
pub struct FeedHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::prpc::{PrpcError, Transport};
    use crate::services::simulation::JitterSimulator;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingTransport {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Transport for CountingTransport {
        async fn get_json(&self, _url: &str) -> Result<Value, PrpcError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!([{"id": format!("n{}", call), "pubkey": "pk", "uptime": 90.0}]))
        }
    }

    struct DownTransport;

    #[async_trait]
    impl Transport for DownTransport {
        async fn get_json(&self, _url: &str) -> Result<Value, PrpcError> {
            Err(PrpcError::Status(502))
        }
    }

    fn counting_feed() -> (NodeFeed, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let transport = CountingTransport { calls: calls.clone() };
        let client = PrpcClient::new("http://prpc.test", Arc::new(transport), Arc::new(Vec::new()));
        (NodeFeed::new(client), calls)
    }

    #[tokio::test]
    async fn test_refresh_replaces_list() {
        let (feed, _) = counting_feed();
        feed.refresh().await;
        feed.refresh().await;

        let nodes = feed.nodes().await;
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id, "n1");
        assert!(feed.find("n1").await.is_some());
        assert!(feed.find("pk").await.is_some());
    }

    #[tokio::test]
    async fn test_refresh_falls_back_when_upstream_down() {
        let fallback = Arc::new(vec![Node::bare("fb", "pk-fb")]);
        let client = PrpcClient::new("http://prpc.test", Arc::new(DownTransport), fallback);
        let feed = NodeFeed::new(client);

        assert_eq!(feed.refresh().await, 1);
        assert_eq!(feed.nodes().await[0].id, "fb");
    }

    #[tokio::test]
    async fn test_simulation_perturbs_snapshot() {
        let (feed, _) = counting_feed();
        feed.refresh().await;
        feed.simulate(&JitterSimulator).await;

        let node = &feed.nodes().await[0];
        assert!(node.storage_used.is_some());
        assert!((89.99..=90.01).contains(&node.uptime.unwrap()));
    }

    #[tokio::test]
    async fn test_dropping_handle_stops_polling() {
        let (feed, calls) = counting_feed();
        let handle = feed.spawn(Duration::from_millis(10), None);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(calls.load(Ordering::SeqCst) >= 2);

        drop(handle);
        let stopped_at = calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(calls.load(Ordering::SeqCst), stopped_at);
    }
}
