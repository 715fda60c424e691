// src/models.rs
use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const MAX_PUBKEY_LEN: usize = 128;
pub const MAX_NODE_ID_LEN: usize = 64;
pub const MAX_REGION_FILTER_LEN: usize = 64;

/// A storage-provider node as reported by pRPC.
///
/// Only `id` and `pubkey` are required. Absent fields mean "unknown";
/// arithmetic call sites read them as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub pubkey: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, deserialize_with = "whole_port", skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "whole_millis", skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_capacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_used: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reputation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_stake: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_rewards: Option<f64>,
}

impl Node {
    /// A node with only its identity set.
    pub fn bare(id: impl Into<String>, pubkey: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pubkey: pubkey.into(),
            ip: None,
            port: None,
            version: None,
            last_seen: None,
            storage_capacity: None,
            storage_used: None,
            uptime: None,
            status: None,
            reputation: None,
            region: None,
            latency: None,
            total_stake: None,
            recent_rewards: None,
        }
    }

    pub fn storage_usage_percent(&self) -> f64 {
        let capacity = self.storage_capacity.unwrap_or(0.0);
        if capacity > 0.0 {
            self.storage_used.unwrap_or(0.0) / capacity * 100.0
        } else {
            0.0
        }
    }
}

// Upstream numbers are plain JSON numbers; fractional values are truncated.
fn whole_millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Option::<f64>::deserialize(deserializer)? {
        Some(ms) if ms.is_finite() => Ok(Some(ms.trunc() as i64)),
        Some(ms) => Err(de::Error::custom(format!("invalid lastSeen: {}", ms))),
        None => Ok(None),
    }
}

fn whole_port<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u16>, D::Error> {
    match Option::<f64>::deserialize(deserializer)? {
        Some(port) if port.is_finite() && (0.0..=f64::from(u16::MAX)).contains(&port) => {
            Ok(Some(port.trunc() as u16))
        }
        Some(port) => Err(de::Error::custom(format!("invalid port: {}", port))),
        None => Ok(None),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeStatus {
    Online,
    Offline,
    Syncing,
    Healthy,
    Warning,
    Critical,
    /// Any other upstream label, kept verbatim.
    Other(String),
}

impl NodeStatus {
    /// Known labels match case-insensitively; anything else is kept as is.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "online" => NodeStatus::Online,
            "offline" => NodeStatus::Offline,
            "syncing" => NodeStatus::Syncing,
            "healthy" => NodeStatus::Healthy,
            "warning" => NodeStatus::Warning,
            "critical" => NodeStatus::Critical,
            _ => NodeStatus::Other(label.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            NodeStatus::Online => "online",
            NodeStatus::Offline => "offline",
            NodeStatus::Syncing => "syncing",
            NodeStatus::Healthy => "healthy",
            NodeStatus::Warning => "warning",
            NodeStatus::Critical => "critical",
            NodeStatus::Other(label) => label,
        }
    }

    /// Severity rank used when sorting by status.
    pub fn rank(&self) -> u8 {
        match self {
            NodeStatus::Healthy | NodeStatus::Online => 3,
            NodeStatus::Warning | NodeStatus::Syncing => 2,
            NodeStatus::Critical | NodeStatus::Offline => 1,
            NodeStatus::Other(_) => 0,
        }
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(NodeStatus::from_label(&label))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_nodes: usize,
    pub online_nodes: usize,
    pub offline_nodes: usize,
    pub total_storage: f64,
    pub used_storage: f64,
    pub average_uptime: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionStorage {
    pub region: String,
    pub total: f64,
    pub used: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Success,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Success => "success",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardStatus {
    Claimed,
    Pending,
}

#[derive(Debug, Clone, Serialize)]
pub struct RewardEntry {
    pub epoch: u32,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub status: RewardStatus,
}

// Response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PnodesResponse {
    pub p_nodes: Vec<Node>,
    pub timestamp: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PnodesErrorResponse {
    pub error: String,
    pub p_nodes: Vec<Node>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkHealth {
    pub average_latency: u64,
    pub active_peers: usize,
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_parses_camel_case_with_missing_fields() {
        let node: Node = serde_json::from_str(
            r#"{"id":"n1","pubkey":"pk1","storageCapacity":1000,"storageUsed":800,"status":"Online"}"#,
        )
        .unwrap();

        assert_eq!(node.storage_capacity, Some(1000.0));
        assert_eq!(node.status, Some(NodeStatus::Online));
        assert_eq!(node.uptime, None);
    }

    #[test]
    fn test_unrecognized_status_keeps_its_label() {
        let node: Node =
            serde_json::from_str(r#"{"id":"n1","pubkey":"pk1","status":"degraded"}"#).unwrap();
        assert_eq!(node.status, Some(NodeStatus::Other("degraded".to_string())));
        assert_eq!(node.status.as_ref().unwrap().rank(), 0);

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["status"], "degraded");
    }

    #[test]
    fn test_fractional_timestamp_and_float_port_decode() {
        let node: Node = serde_json::from_str(
            r#"{"id":"n1","pubkey":"pk1","lastSeen":1700000000000.5,"port":8899.0}"#,
        )
        .unwrap();
        assert_eq!(node.last_seen, Some(1_700_000_000_000));
        assert_eq!(node.port, Some(8899));

        let node: Node =
            serde_json::from_str(r#"{"id":"n1","pubkey":"pk1","lastSeen":null,"port":9000}"#).unwrap();
        assert_eq!(node.last_seen, None);
        assert_eq!(node.port, Some(9000));
    }

    #[test]
    fn test_out_of_range_port_is_rejected() {
        let result = serde_json::from_str::<Node>(r#"{"id":"n1","pubkey":"pk1","port":70000}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let json = serde_json::to_value(Node::bare("n1", "pk1")).unwrap();
        assert_eq!(json, serde_json::json!({"id": "n1", "pubkey": "pk1"}));
    }
}
