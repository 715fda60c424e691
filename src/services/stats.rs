// src/services/stats.rs
use crate::models::{Node, NodeStatus, RegionStorage, Stats};

pub const UNKNOWN_REGION: &str = "Unknown";

/// Reduce a node list to its summary statistics.
///
/// A node without a status counts as online. Nodes whose uptime is zero or
/// absent are left out of the uptime average, so an all-offline list
/// averages to zero.
pub fn aggregate(nodes: &[Node]) -> Stats {
    let online_nodes = nodes
        .iter()
        .filter(|node| matches!(node.status, None | Some(NodeStatus::Online)))
        .count();

    let total_storage: f64 = nodes.iter().filter_map(|n| n.storage_capacity).sum();
    let used_storage: f64 = nodes.iter().filter_map(|n| n.storage_used).sum();

    let uptimes: Vec<f64> = nodes
        .iter()
        .map(|n| n.uptime.unwrap_or(0.0))
        .filter(|&u| u > 0.0)
        .collect();
    let average_uptime = if uptimes.is_empty() {
        0.0
    } else {
        uptimes.iter().sum::<f64>() / uptimes.len() as f64
    };

    Stats {
        total_nodes: nodes.len(),
        online_nodes,
        offline_nodes: nodes.len() - online_nodes,
        total_storage,
        used_storage,
        average_uptime,
    }
}

/// Capacity and usage per region, in order of first appearance.
pub fn storage_by_region(nodes: &[Node]) -> Vec<RegionStorage> {
    let mut regions: Vec<RegionStorage> = Vec::new();

    for node in nodes {
        let name = node.region.as_deref().unwrap_or(UNKNOWN_REGION);
        let index = match regions.iter().position(|r| r.region == name) {
            Some(index) => index,
            None => {
                regions.push(RegionStorage {
                    region: name.to_string(),
                    total: 0.0,
                    used: 0.0,
                });
                regions.len() - 1
            }
        };

        regions[index].total += node.storage_capacity.unwrap_or(0.0);
        regions[index].used += node.storage_used.unwrap_or(0.0);
    }

    regions
}

/// Rounded mean latency over every node; absent latency counts as zero.
pub fn average_latency(nodes: &[Node]) -> u64 {
    if nodes.is_empty() {
        return 0;
    }
    let total: f64 = nodes.iter().map(|n| n.latency.unwrap_or(0.0)).sum();
    (total / nodes.len() as f64).round() as u64
}

/// Estimated gossip peers; each node keeps roughly a dozen neighbours on
/// top of the bootstrap set.
pub fn estimated_peers(nodes: &[Node]) -> usize {
    nodes.len() * 12 + 450
}
