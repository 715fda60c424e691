// src/templates/node_detail.rs
use chrono::{TimeZone, Utc};

use super::{html_escape, render_page, status_badge};
use crate::models::{LogEntry, Node, RewardEntry, RewardStatus};
use crate::utils::format::{format_number, format_storage};

pub fn render(node: &Node, logs: &[LogEntry], rewards: &[RewardEntry]) -> String {
    let capacity = node.storage_capacity.unwrap_or(0.0);
    let used = node.storage_used.unwrap_or(0.0);

    let address = match (&node.ip, node.port) {
        (Some(ip), Some(port)) => format!("{}:{}", ip, port),
        (Some(ip), None) => ip.clone(),
        _ => "N/A".to_string(),
    };

    let last_seen = node
        .last_seen
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    let log_rows = logs
        .iter()
        .map(|log| {
            format!(
                r#"<tr><td>{}</td><td class="status status-{}">{}</td><td>{}</td></tr>"#,
                log.timestamp.format("%Y-%m-%d %H:%M:%S"),
                log.level.as_str(),
                log.level.as_str(),
                html_escape(&log.message)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let reward_rows = rewards
        .iter()
        .map(|reward| {
            let status = match reward.status {
                RewardStatus::Pending => "pending",
                RewardStatus::Claimed => "claimed",
            };
            format!(
                "<tr><td>{}</td><td>{:.2} XAN</td><td>{}</td><td>{}</td></tr>",
                reward.epoch,
                reward.amount,
                reward.date.format("%Y-%m-%d"),
                status
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let content = format!(
        r#"
    <h1>{}</h1>
    <p><code>{}</code> {}</p>

    <div class="stats-grid">
        <div class="stat-card">
            <div class="stat-label">Uptime</div>
            <div class="stat-value">{}%</div>
        </div>
        <div class="stat-card">
            <div class="stat-label">Used Storage</div>
            <div class="stat-value">{} / {}</div>
            <div>{:.1}% Full · {} free</div>
        </div>
        <div class="stat-card">
            <div class="stat-label">Total Stake</div>
            <div class="stat-value">{} XAN</div>
        </div>
        <div class="stat-card">
            <div class="stat-label">Rewards (24h)</div>
            <div class="stat-value">{} XAN</div>
        </div>
    </div>

    <div class="section">
        <h2>Node Details</h2>
        <table>
            <tr><th>Address</th><td>{}</td></tr>
            <tr><th>Version</th><td>{}</td></tr>
            <tr><th>Region</th><td>{}</td></tr>
            <tr><th>Latency</th><td>{}ms</td></tr>
            <tr><th>Reputation</th><td>{}</td></tr>
            <tr><th>Last Seen</th><td>{}</td></tr>
        </table>
    </div>

    <div class="section">
        <h2>Recent Activity</h2>
        <table>
            <thead><tr><th>Time</th><th>Level</th><th>Message</th></tr></thead>
            <tbody>{}</tbody>
        </table>
    </div>

    <div class="section">
        <h2>Reward History</h2>
        <table>
            <thead><tr><th>Epoch</th><th>Amount</th><th>Date</th><th>Status</th></tr></thead>
            <tbody>{}</tbody>
        </table>
    </div>
    "#,
        html_escape(&node.id),
        html_escape(&node.pubkey),
        status_badge(node.status.as_ref()),
        format_number(node.uptime.unwrap_or(0.0)),
        format_storage(used),
        format_storage(capacity),
        node.storage_usage_percent(),
        format_storage((capacity - used).max(0.0)),
        format_number(node.total_stake.unwrap_or(0.0)),
        format_number(node.recent_rewards.unwrap_or(0.0)),
        html_escape(&address),
        html_escape(node.version.as_deref().unwrap_or("N/A")),
        html_escape(node.region.as_deref().unwrap_or("Unknown")),
        format_number(node.latency.unwrap_or(0.0)),
        format_number(node.reputation.unwrap_or(0.0)),
        last_seen,
        log_rows,
        reward_rows
    );

    render_page(&html_escape(&node.id), "", &content)
}
