// src/templates/mod.rs
pub mod dashboard;
pub mod network_map;
pub mod node_detail;
pub mod search;
pub mod settings;

mod layout;

pub use crate::utils::validation::sanitize_html as html_escape;
pub use layout::render_page;

use crate::models::{Node, NodeStatus};
use crate::services::selection::Selection;

pub(crate) fn status_badge(status: Option<&NodeStatus>) -> String {
    let label = html_escape(status.map_or("offline", NodeStatus::as_str));
    format!(r#"<span class="status status-{0}">{0}</span>"#, label)
}

pub(crate) fn node_link(node: &Node) -> String {
    format!(
        r#"<a href="/pnode/{}">{}</a>"#,
        urlencoding::encode(&node.id),
        html_escape(&node.id)
    )
}

/// Previous / numbered / next links; `href` maps a page number to a URL.
pub(crate) fn pagination<F>(selection: &Selection, href: F) -> String
where
    F: Fn(usize) -> String,
{
    if selection.total_pages <= 1 {
        return String::new();
    }

    let mut parts = Vec::new();
    if selection.page > 1 {
        parts.push(format!(r#"<a href="{}">Previous</a>"#, href(selection.page - 1)));
    }
    for page in 1..=selection.total_pages {
        if page == selection.page {
            parts.push(format!("<span><strong>{}</strong></span>", page));
        } else {
            parts.push(format!(r#"<a href="{}">{}</a>"#, href(page), page));
        }
    }
    if selection.page < selection.total_pages {
        parts.push(format!(r#"<a href="{}">Next</a>"#, href(selection.page + 1)));
    }

    format!(r#"<div class="pagination">{}</div>"#, parts.join(""))
}
