// src/templates/dashboard.rs
use super::{node_link, pagination, render_page, status_badge};
use crate::models::{NetworkHealth, Node, Stats};
use crate::services::selection::{Selection, SortDirection, SortKey};
use crate::utils::format::{format_number, format_storage};

const COLUMNS: [(SortKey, &str); 5] = [
    (SortKey::Id, "pNode ID"),
    (SortKey::Status, "Status"),
    (SortKey::Uptime, "Uptime"),
    (SortKey::TotalStake, "Stake (XAN)"),
    (SortKey::RecentRewards, "Rewards (24h)"),
];

pub fn render(
    stats: &Stats,
    health: &NetworkHealth,
    table: &Selection,
    sort: SortKey,
    direction: SortDirection,
) -> String {
    let rows = if table.nodes.is_empty() {
        r#"<tr><td colspan="5">No pNodes reported.</td></tr>"#.to_string()
    } else {
        table.nodes.iter().map(render_row).collect::<Vec<_>>().join("\n")
    };

    let headers = COLUMNS
        .iter()
        .map(|(key, label)| sortable_header(*key, label, sort, direction))
        .collect::<Vec<_>>()
        .join("");

    let pages = pagination(table, |page| {
        format!("/dashboard?sort={}&dir={}&page={}", sort.as_str(), direction.as_str(), page)
    });

    let content = format!(
        r#"
    <h1>Network Overview</h1>

    <div class="stats-grid">
        <div class="stat-card">
            <div class="stat-label">Total pNodes</div>
            <div class="stat-value">{}</div>
        </div>
        <div class="stat-card">
            <div class="stat-label">Online</div>
            <div class="stat-value">{} <small>/ {} offline</small></div>
        </div>
        <div class="stat-card">
            <div class="stat-label">Storage Used</div>
            <div class="stat-value">{} / {}</div>
        </div>
        <div class="stat-card">
            <div class="stat-label">Average Uptime</div>
            <div class="stat-value">{:.2}%</div>
        </div>
    </div>

    <div class="section">
        <h2>Network Health</h2>
        <div class="stats-grid">
            <div class="stat-card">
                <div class="stat-label">Avg Latency</div>
                <div class="stat-value">{}ms</div>
            </div>
            <div class="stat-card">
                <div class="stat-label">Active Peers</div>
                <div class="stat-value">{}</div>
            </div>
            <div class="stat-card">
                <div class="stat-label">Last Updated</div>
                <div class="stat-value">{}</div>
            </div>
        </div>
    </div>

    <div class="section">
        <h2>Active pNodes</h2>
        <p><a href="/api/pnodes/export.csv">Export CSV</a></p>
        <table>
            <thead><tr>{}</tr></thead>
            <tbody>
            {}
            </tbody>
        </table>
        {}
    </div>
    "#,
        stats.total_nodes,
        stats.online_nodes,
        stats.offline_nodes,
        format_storage(stats.used_storage),
        format_storage(stats.total_storage),
        stats.average_uptime,
        health.average_latency,
        health.active_peers,
        health.last_updated.format("%H:%M:%S UTC"),
        headers,
        rows,
        pages
    );

    render_page("Dashboard", "/dashboard", &content)
}

/// Clicking the active column flips direction; a new column starts descending.
fn sortable_header(key: SortKey, label: &str, current: SortKey, direction: SortDirection) -> String {
    let (next, marker) = if key == current {
        let marker = match direction {
            SortDirection::Asc => " ▲",
            SortDirection::Desc => " ▼",
        };
        (direction.flipped(), marker)
    } else {
        (SortDirection::Desc, "")
    };

    format!(
        r#"<th><a href="/dashboard?sort={}&dir={}&page=1">{}{}</a></th>"#,
        key.as_str(),
        next.as_str(),
        label,
        marker
    )
}

fn render_row(node: &Node) -> String {
    format!(
        r#"<tr>
                <td>{}</td>
                <td>{}</td>
                <td>{}%</td>
                <td>{}</td>
                <td>{}</td>
            </tr>"#,
        node_link(node),
        status_badge(node.status.as_ref()),
        format_number(node.uptime.unwrap_or(0.0)),
        format_number(node.total_stake.unwrap_or(0.0)),
        format_number(node.recent_rewards.unwrap_or(0.0)),
    )
}
