// src/services/selection.rs
//
// Filter, sort and paginate a node list. Every listing in the dashboard
// goes through `select` with its own `PageProfile`.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::{Node, NodeStatus};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeFilter {
    pub status: Option<String>,
    pub region: Option<String>,
    pub min_uptime: Option<f64>,
}

impl NodeFilter {
    pub fn is_empty(&self) -> bool {
        self.status_label().is_none() && self.region_needle().is_none() && self.min_uptime.is_none()
    }

    /// Lowercased status to match, or `None` for "All"/blank.
    fn status_label(&self) -> Option<String> {
        self.status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
            .map(str::to_lowercase)
    }

    fn region_needle(&self) -> Option<String> {
        self.region
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    fn matches_with(&self, node: &Node, status: Option<&str>, region: Option<&str>) -> bool {
        if let Some(status) = status {
            match &node.status {
                Some(s) if s.as_str().eq_ignore_ascii_case(status) => {}
                _ => return false,
            }
        }

        if let Some(needle) = region {
            match &node.region {
                Some(r) if r.to_lowercase().contains(needle) => {}
                _ => return false,
            }
        }

        if let Some(min) = self.min_uptime {
            if node.uptime.unwrap_or(0.0) < min {
                return false;
            }
        }

        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "status")]
    Status,
    #[serde(rename = "uptime")]
    Uptime,
    #[serde(rename = "totalStake")]
    TotalStake,
    #[serde(rename = "recentRewards")]
    RecentRewards,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Status => "status",
            SortKey::Uptime => "uptime",
            SortKey::TotalStake => "totalStake",
            SortKey::RecentRewards => "recentRewards",
        }
    }

    fn compare(&self, a: &Node, b: &Node) -> Ordering {
        match self {
            SortKey::Id => a.id.to_lowercase().cmp(&b.id.to_lowercase()),
            SortKey::Status => status_rank(a).cmp(&status_rank(b)),
            SortKey::Uptime => number(a.uptime).total_cmp(&number(b.uptime)),
            SortKey::TotalStake => number(a.total_stake).total_cmp(&number(b.total_stake)),
            SortKey::RecentRewards => number(a.recent_rewards).total_cmp(&number(b.recent_rewards)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Default sort and page size for one listing.
#[derive(Debug, Clone, Copy)]
pub struct PageProfile {
    pub sort: SortKey,
    pub direction: SortDirection,
    pub page_size: usize,
}

pub const DASHBOARD_PROFILE: PageProfile = PageProfile {
    sort: SortKey::TotalStake,
    direction: SortDirection::Desc,
    page_size: 8,
};

pub const SEARCH_PROFILE: PageProfile = PageProfile {
    sort: SortKey::Id,
    direction: SortDirection::Asc,
    page_size: 10,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub nodes: Vec<Node>,
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
}

// A node without a status ranks as offline.
fn status_rank(node: &Node) -> u8 {
    node.status.as_ref().map_or(NodeStatus::Offline.rank(), NodeStatus::rank)
}

fn number(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

/// Filter, stably sort and cut one page out of `nodes`.
///
/// `page` is 1-based and clamped into `1..=total_pages`.
pub fn select(
    nodes: &[Node],
    filter: &NodeFilter,
    sort: SortKey,
    direction: SortDirection,
    page: usize,
    page_size: usize,
) -> Selection {
    let page_size = page_size.max(1);
    let status = filter.status_label();
    let region = filter.region_needle();

    let mut matched: Vec<&Node> = nodes
        .iter()
        .filter(|node| filter.matches_with(node, status.as_deref(), region.as_deref()))
        .collect();

    // sort_by is stable; reversing the ordering keeps ties in input order.
    matched.sort_by(|a, b| match direction {
        SortDirection::Asc => sort.compare(a, b),
        SortDirection::Desc => sort.compare(a, b).reverse(),
    });

    let total_matches = matched.len();
    let total_pages = total_matches.div_ceil(page_size);
    let page = page.clamp(1, total_pages.max(1));
    let start = (page - 1) * page_size;

    Selection {
        nodes: matched
            .into_iter()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect(),
        page,
        total_pages,
        total_matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, status: Option<NodeStatus>, uptime: Option<f64>, region: Option<&str>) -> Node {
        let mut node = Node::bare(id, format!("pk-{}", id));
        node.status = status;
        node.uptime = uptime;
        node.region = region.map(String::from);
        node
    }

    fn fleet() -> Vec<Node> {
        vec![
            node("a-offline", Some(NodeStatus::Offline), Some(0.0), Some("Tokyo, JP")),
            node("b-warning", Some(NodeStatus::Warning), Some(92.5), Some("London, UK")),
            node("c-online", Some(NodeStatus::Online), Some(99.9), Some("New York, USA")),
            node("d-critical", Some(NodeStatus::Critical), Some(40.0), Some("US-East")),
            node("e-healthy", Some(NodeStatus::Healthy), Some(97.0), Some("EU")),
            node("f-syncing", Some(NodeStatus::Syncing), Some(88.0), None),
        ]
    }

    fn ids(selection: &Selection) -> Vec<&str> {
        selection.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_status_filter_is_case_insensitive() {
        let filter = NodeFilter {
            status: Some("ONLINE".into()),
            ..Default::default()
        };
        let result = select(&fleet(), &filter, SortKey::Id, SortDirection::Asc, 1, 8);
        assert_eq!(ids(&result), vec!["c-online"]);
    }

    #[test]
    fn test_all_status_means_no_filter() {
        let filter = NodeFilter {
            status: Some("All".into()),
            ..Default::default()
        };
        assert!(filter.is_empty());
        let result = select(&fleet(), &filter, SortKey::Id, SortDirection::Asc, 1, 8);
        assert_eq!(result.total_matches, 6);
    }

    #[test]
    fn test_region_substring_filter() {
        let filter = NodeFilter {
            region: Some("us".into()),
            ..Default::default()
        };
        let result = select(&fleet(), &filter, SortKey::Id, SortDirection::Asc, 1, 8);
        assert_eq!(ids(&result), vec!["c-online", "d-critical"]);
    }

    #[test]
    fn test_min_uptime_is_inclusive() {
        let filter = NodeFilter {
            min_uptime: Some(92.5),
            ..Default::default()
        };
        let result = select(&fleet(), &filter, SortKey::Id, SortDirection::Asc, 1, 8);
        assert_eq!(ids(&result), vec!["b-warning", "c-online", "e-healthy"]);
    }

    #[test]
    fn test_unreachable_uptime_yields_nothing() {
        let filter = NodeFilter {
            status: Some("online".into()),
            min_uptime: Some(101.0),
            ..Default::default()
        };
        let result = select(&fleet(), &filter, SortKey::Id, SortDirection::Asc, 1, 8);
        assert!(result.nodes.is_empty());
        assert_eq!(result.total_pages, 0);
    }

    #[test]
    fn test_status_sort_uses_severity_rank() {
        let result = select(
            &fleet(),
            &NodeFilter::default(),
            SortKey::Status,
            SortDirection::Desc,
            1,
            8,
        );
        // Ties keep input order.
        assert_eq!(
            ids(&result),
            vec!["c-online", "e-healthy", "b-warning", "f-syncing", "a-offline", "d-critical"]
        );
    }

    #[test]
    fn test_missing_status_sorts_as_offline() {
        let nodes = vec![
            node("x", Some(NodeStatus::Other("degraded".to_string())), None, None),
            node("y", None, None, None),
            node("z", Some(NodeStatus::Warning), None, None),
        ];
        let result = select(&nodes, &NodeFilter::default(), SortKey::Status, SortDirection::Asc, 1, 8);
        assert_eq!(ids(&result), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_filter_matches_unlisted_status_label() {
        let nodes = vec![
            node("a", Some(NodeStatus::Other("Degraded".to_string())), None, None),
            node("b", Some(NodeStatus::Online), None, None),
        ];
        let filter = NodeFilter {
            status: Some("degraded".into()),
            ..Default::default()
        };
        let result = select(&nodes, &filter, SortKey::Id, SortDirection::Asc, 1, 8);
        assert_eq!(ids(&result), vec!["a"]);
    }

    #[test]
    fn test_id_sort_ignores_case() {
        let nodes = vec![
            node("beta", None, None, None),
            node("Alpha", None, None, None),
            node("Charlie", None, None, None),
        ];
        let result = select(&nodes, &NodeFilter::default(), SortKey::Id, SortDirection::Asc, 1, 8);
        assert_eq!(ids(&result), vec!["Alpha", "beta", "Charlie"]);
    }

    #[test]
    fn test_descending_keeps_ties_stable() {
        let mut nodes = vec![
            node("first", None, None, None),
            node("second", None, None, None),
            node("third", None, None, None),
        ];
        nodes[0].total_stake = Some(10.0);
        nodes[1].total_stake = Some(10.0);
        nodes[2].total_stake = Some(20.0);

        let result = select(&nodes, &NodeFilter::default(), SortKey::TotalStake, SortDirection::Desc, 1, 8);
        assert_eq!(ids(&result), vec!["third", "first", "second"]);
    }

    #[test]
    fn test_page_beyond_range_clamps_to_last() {
        let nodes: Vec<Node> = (0..20)
            .map(|i| node(&format!("n{:02}", i), None, None, None))
            .collect();
        let result = select(&nodes, &NodeFilter::default(), SortKey::Id, SortDirection::Asc, 999, 8);

        assert_eq!(result.total_pages, 3);
        assert_eq!(result.page, 3);
        assert_eq!(ids(&result), vec!["n16", "n17", "n18", "n19"]);
    }

    #[test]
    fn test_page_zero_clamps_to_first() {
        let result = select(&fleet(), &NodeFilter::default(), SortKey::Id, SortDirection::Asc, 0, 4);
        assert_eq!(result.page, 1);
        assert_eq!(result.nodes.len(), 4);
        assert_eq!(result.total_pages, 2);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let nodes = fleet();
        let before = nodes.clone();
        let _ = select(&nodes, &NodeFilter::default(), SortKey::Uptime, SortDirection::Desc, 1, 2);
        assert_eq!(nodes, before);
    }

    #[test]
    fn test_sort_key_wire_names() {
        let key: SortKey = serde_json::from_str("\"totalStake\"").unwrap();
        assert_eq!(key, SortKey::TotalStake);
        assert_eq!(SortKey::RecentRewards.as_str(), "recentRewards");
    }
}
