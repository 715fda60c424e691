// src/services/directory.rs
//
// Synthetic node directory. Used as the fallback dataset when pRPC is
// unreachable, and for the per-view log and reward history.
use chrono::{Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::collections::HashSet;

use crate::models::{LogEntry, LogLevel, Node, NodeStatus, RewardEntry, RewardStatus};
use crate::utils::format::round_to;

pub const FILLER_NODE_COUNT: usize = 20;

const REGIONS: [&str; 5] = ["US-East", "US-West", "EU", "Asia-Pacific", "South America"];

// Online three times as likely as warning.
const FILLER_STATUSES: [NodeStatus; 4] = [
    NodeStatus::Online,
    NodeStatus::Online,
    NodeStatus::Online,
    NodeStatus::Warning,
];

const LOG_LEVELS: [LogLevel; 4] = [
    LogLevel::Info,
    LogLevel::Info,
    LogLevel::Success,
    LogLevel::Warning,
];

const LOG_MESSAGES: [&str; 8] = [
    "Syncing block headers...",
    "Processed 1024 transactions",
    "Connection to peer established",
    "Garbage collection started",
    "Snapshot saved successfully",
    "High latency detected on neighbor",
    "Reward distribution received",
    "Updating ledger state",
];

const LATEST_REWARD_EPOCH: u32 = 248;

/// Build the full directory: the fixed exemplars followed by random filler.
pub fn generate_directory<R: Rng + ?Sized>(rng: &mut R) -> Vec<Node> {
    let now = Utc::now().timestamp_millis();
    let mut nodes = exemplar_nodes(now);

    let mut taken: HashSet<String> = nodes.iter().map(|n| n.id.clone()).collect();
    for index in 0..FILLER_NODE_COUNT {
        let node = filler_node(rng, index, now, &taken);
        taken.insert(node.id.clone());
        nodes.push(node);
    }

    nodes
}

/// Hand-authored nodes covering each interesting edge: a fully offline
/// node with zero uptime, latency and rewards, and one near capacity.
pub fn exemplar_nodes(now_ms: i64) -> Vec<Node> {
    vec![
        exemplar(
            "pNode-Alpha-001",
            "XandeumAlpha001",
            ("192.168.1.101", 8899, "v2.1.8-beta"),
            now_ms,
            (1000.0, 800.0),
            (99.98, NodeStatus::Online, 98.0),
            ("New York, USA", 45.0),
            (50000.0, 125.50),
        ),
        exemplar(
            "pNode-Beta-002",
            "XandeumBeta002",
            ("192.168.1.102", 8900, "v2.1.7"),
            now_ms - 3_600_000,
            (2000.0, 1500.0),
            (92.5, NodeStatus::Warning, 85.0),
            ("London, UK", 120.0),
            (35000.0, 80.25),
        ),
        exemplar(
            "pNode-Gamma-003",
            "XandeumGamma003",
            ("192.168.1.103", 8901, "v2.0.0"),
            now_ms - 86_400_000,
            (500.0, 100.0),
            (0.0, NodeStatus::Offline, 40.0),
            ("Tokyo, JP", 0.0),
            (10000.0, 0.0),
        ),
        exemplar(
            "pNode-Delta-004",
            "XandeumDelta004",
            ("192.168.1.104", 8902, "v2.1.8"),
            now_ms,
            (1500.0, 750.0),
            (99.5, NodeStatus::Online, 95.0),
            ("Sydney, AU", 180.0),
            (45000.0, 110.00),
        ),
        exemplar(
            "pNode-Epsilon-005",
            "XandeumEpsilon005",
            ("192.168.1.105", 8903, "v2.1.9-rc"),
            now_ms,
            (1200.0, 1100.0),
            (98.2, NodeStatus::Online, 90.0),
            ("Berlin, DE", 60.0),
            (42000.0, 95.50),
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn exemplar(
    id: &str,
    pubkey_prefix: &str,
    (ip, port, version): (&str, u16, &str),
    last_seen: i64,
    (capacity, used): (f64, f64),
    (uptime, status, reputation): (f64, NodeStatus, f64),
    (region, latency): (&str, f64),
    (stake, rewards): (f64, f64),
) -> Node {
    Node {
        id: id.to_string(),
        pubkey: format!("{}{}", pubkey_prefix, "0".repeat(30)),
        ip: Some(ip.to_string()),
        port: Some(port),
        version: Some(version.to_string()),
        last_seen: Some(last_seen),
        storage_capacity: Some(capacity),
        storage_used: Some(used),
        uptime: Some(uptime),
        status: Some(status),
        reputation: Some(reputation),
        region: Some(region.to_string()),
        latency: Some(latency),
        total_stake: Some(stake),
        recent_rewards: Some(rewards),
    }
}

fn filler_node<R: Rng + ?Sized>(
    rng: &mut R,
    index: usize,
    now_ms: i64,
    taken: &HashSet<String>,
) -> Node {
    let storage_capacity = rng.gen_range(100..1100) as f64;
    let storage_used = (storage_capacity * rng.gen_range(0.3..0.8)).floor();

    let status = FILLER_STATUSES[rng.gen_range(0..FILLER_STATUSES.len())].clone();
    let uptime = if status == NodeStatus::Offline {
        0.0
    } else {
        round_to(85.0 + rng.gen::<f64>() * 15.0, 2)
    };

    let total_stake = rng.gen_range(20_000..70_000) as f64;
    let recent_rewards = round_to(total_stake * rng.gen_range(0.01..0.03), 2);

    Node {
        id: unique_filler_id(rng, taken),
        pubkey: format!("Xandeum{}{}", index + 6, "0".repeat(30)),
        ip: Some(format!(
            "192.168.{}.{}",
            rng.gen_range(0..255),
            rng.gen_range(0..255)
        )),
        port: Some(8899 + 5 + index as u16),
        version: Some(format!("1.{}.{}", rng.gen_range(0..5), rng.gen_range(0..10))),
        last_seen: Some(now_ms - rng.gen_range(0..3_600_000)),
        storage_capacity: Some(storage_capacity),
        storage_used: Some(storage_used),
        uptime: Some(uptime),
        status: Some(status),
        reputation: Some(rng.gen_range(70..100) as f64),
        region: Some(REGIONS[rng.gen_range(0..REGIONS.len())].to_string()),
        latency: Some(rng.gen_range(10..210) as f64),
        total_stake: Some(total_stake),
        recent_rewards: Some(recent_rewards),
    }
}

fn unique_filler_id<R: Rng + ?Sized>(rng: &mut R, taken: &HashSet<String>) -> String {
    loop {
        let tag: String = (0..4)
            .map(|_| char::from(rng.sample(Alphanumeric)).to_ascii_uppercase())
            .collect();
        let id = format!("pNode-{}-{}", tag, rng.gen_range(100..1000));
        if !taken.contains(&id) {
            return id;
        }
    }
}

/// Synthetic activity log for a node detail view, newest first.
pub fn generate_logs<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<LogEntry> {
    let now = Utc::now();
    let mut logs: Vec<LogEntry> = (0..count)
        .map(|i| LogEntry {
            id: format!("log-{}-{}", now.timestamp_millis(), i),
            timestamp: now - Duration::milliseconds(rng.gen_range(0..86_400_000)),
            level: LOG_LEVELS[rng.gen_range(0..LOG_LEVELS.len())],
            message: LOG_MESSAGES[rng.gen_range(0..LOG_MESSAGES.len())].to_string(),
        })
        .collect();

    logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    logs
}

/// Synthetic reward history; only the most recent epoch is still pending.
pub fn generate_rewards<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<RewardEntry> {
    let now = Utc::now();
    (0..count)
        .map(|i| RewardEntry {
            epoch: LATEST_REWARD_EPOCH.saturating_sub(i as u32),
            amount: round_to(12.0 + rng.gen::<f64>() * 5.0, 2),
            date: now - Duration::days(2 * i as i64),
            status: if i == 0 {
                RewardStatus::Pending
            } else {
                RewardStatus::Claimed
            },
        })
        .collect()
}
