// src/templates/network_map.rs
use super::{html_escape, node_link, render_page, status_badge};
use crate::models::{Node, RegionStorage};
use crate::services::stats::UNKNOWN_REGION;
use crate::utils::format::format_storage;

pub fn render(regions: &[RegionStorage], nodes: &[Node]) -> String {
    let sections = if regions.is_empty() {
        r#"<div class="empty-state"><p>No pNodes reported.</p></div>"#.to_string()
    } else {
        regions
            .iter()
            .map(|region| render_region(region, nodes))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let content = format!(
        r#"
    <h1>Network Map</h1>
    <p>{} pNodes across {} regions</p>
    {}
    "#,
        nodes.len(),
        regions.len(),
        sections
    );

    render_page("Network Map", "/network-map", &content)
}

fn render_region(region: &RegionStorage, nodes: &[Node]) -> String {
    let members: Vec<&Node> = nodes
        .iter()
        .filter(|n| n.region.as_deref().unwrap_or(UNKNOWN_REGION) == region.region)
        .collect();

    let items = members
        .iter()
        .map(|n| format!("<li>{} {}</li>", node_link(n), status_badge(n.status.as_ref())))
        .collect::<Vec<_>>()
        .join("");

    format!(
        r#"<div class="section stat-card">
        <h2>{}</h2>
        <p>{} nodes · {} used of {}</p>
        <ul>{}</ul>
    </div>"#,
        html_escape(&region.region),
        members.len(),
        format_storage(region.used),
        format_storage(region.total),
        items
    )
}
