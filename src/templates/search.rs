// src/templates/search.rs
use super::{html_escape, node_link, pagination, render_page, status_badge};
use crate::services::selection::{NodeFilter, Selection};
use crate::utils::format::format_number;

const STATUS_OPTIONS: [&str; 7] = ["All", "online", "offline", "syncing", "healthy", "warning", "critical"];

pub fn render(filter: &NodeFilter, results: &Selection, error: Option<&str>) -> String {
    let status = filter.status.as_deref().unwrap_or("All");
    let region = filter.region.as_deref().unwrap_or("");
    let min_uptime = filter.min_uptime.unwrap_or(0.0);

    let options = STATUS_OPTIONS
        .iter()
        .map(|option| {
            let selected = if option.eq_ignore_ascii_case(status) { " selected" } else { "" };
            format!(r#"<option value="{0}"{1}>{0}</option>"#, option, selected)
        })
        .collect::<Vec<_>>()
        .join("");

    let rows = if results.nodes.is_empty() {
        r#"<tr><td colspan="4">No pNodes found matching your filters.</td></tr>"#.to_string()
    } else {
        results
            .nodes
            .iter()
            .map(|node| {
                format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}%</td></tr>",
                    node_link(node),
                    status_badge(node.status.as_ref()),
                    html_escape(node.region.as_deref().unwrap_or("Unknown")),
                    format_number(node.uptime.unwrap_or(0.0))
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let query = format!(
        "status={}&region={}&minUptime={}",
        urlencoding::encode(status),
        urlencoding::encode(region),
        format_number(min_uptime)
    );
    let pages = pagination(results, |page| format!("/search?{}&page={}", query, page));

    let summary = if filter.is_empty() {
        format!("Showing all {} pNodes", results.total_matches)
    } else {
        format!("Showing {} results", results.total_matches)
    };

    let error_html = error
        .map(|e| format!(r#"<p class="error">{}</p>"#, html_escape(e)))
        .unwrap_or_default();

    let content = format!(
        r#"
    <h1>pNode Explorer</h1>
    {}
    <form method="GET" action="/search" class="filters">
        <label>Status <select name="status">{}</select></label>
        <label>Location <input type="text" name="region" value="{}" placeholder="e.g. USA, Tokyo"></label>
        <label>Min. Uptime <input type="number" name="minUptime" min="0" max="100" step="0.1" value="{}"></label>
        <button type="submit">Apply</button>
        <a href="/search">Reset</a>
    </form>

    <p>{}</p>
    <table>
        <thead><tr><th>Name/ID</th><th>Status</th><th>Location</th><th>Uptime</th></tr></thead>
        <tbody>
        {}
        </tbody>
    </table>
    {}
    "#,
        error_html,
        options,
        html_escape(region),
        format_number(min_uptime),
        summary,
        rows,
        pages
    );

    render_page("Search", "/search", &content)
}
