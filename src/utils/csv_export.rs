// src/utils/csv_export.rs
use serde::{Deserialize, Serialize};

use crate::models::Node;
use crate::utils::format::format_number;

/// One exported row. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Uptime (%)")]
    pub uptime: String,
    #[serde(rename = "Stake (XAN)")]
    pub total_stake: String,
    #[serde(rename = "Rewards (24h)")]
    pub recent_rewards: String,
    #[serde(rename = "IP Address")]
    pub ip: String,
    #[serde(rename = "Version")]
    pub version: String,
}

impl From<&Node> for CsvRow {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            status: node
                .status
                .as_ref()
                .map(|s| s.as_str().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            uptime: format_number(node.uptime.unwrap_or(0.0)),
            total_stake: format_number(node.total_stake.unwrap_or(0.0)),
            recent_rewards: format_number(node.recent_rewards.unwrap_or(0.0)),
            ip: node.ip.clone().unwrap_or_else(|| "N/A".to_string()),
            version: node.version.clone().unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

/// Export `nodes` in the given order, one row each, with a header line.
pub fn export_nodes(nodes: &[Node]) -> Result<String, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    if nodes.is_empty() {
        writer.write_record(header())?;
    }
    for node in nodes {
        writer.serialize(CsvRow::from(node))?;
    }

    let bytes = writer.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

pub fn header() -> [&'static str; 7] {
    [
        "ID",
        "Status",
        "Uptime (%)",
        "Stake (XAN)",
        "Rewards (24h)",
        "IP Address",
        "Version",
    ]
}

pub fn export_filename(date: chrono::NaiveDate) -> String {
    format!("xandeum_pnodes_{}.csv", date.format("%Y-%m-%d"))
}
