// src/utils/validation.rs
use regex::Regex;

use crate::models::{MAX_NODE_ID_LEN, MAX_PUBKEY_LEN, MAX_REGION_FILTER_LEN};

const MAX_URL_LENGTH: usize = 2048;

lazy_static::lazy_static! {
    static ref NODE_KEY_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_.\-]+$").unwrap();
    static ref REGION_REGEX: Regex = Regex::new(r"^[\p{L}\p{N} ,.\-]*$").unwrap();
}

/// Validates a node id or pubkey taken from a URL path.
pub fn validate_node_key(key: &str) -> bool {
    if key.is_empty() || key.len() > MAX_PUBKEY_LEN.max(MAX_NODE_ID_LEN) {
        return false;
    }

    NODE_KEY_REGEX.is_match(key)
}

/// Validates the free-text region filter.
pub fn validate_region_filter(region: &str) -> Result<(), &'static str> {
    if region.len() > MAX_REGION_FILTER_LEN {
        return Err("Region filter too long (maximum 64 characters)");
    }

    if !REGION_REGEX.is_match(region) {
        return Err("Region filter can only contain letters, numbers, spaces, commas, dots and hyphens");
    }

    Ok(())
}

/// Validates an RPC endpoint URL. Empty is allowed only when `optional`.
pub fn validate_rpc_url(value: &str, optional: bool) -> Result<(), &'static str> {
    let value = value.trim();
    if value.is_empty() {
        return if optional {
            Ok(())
        } else {
            Err("RPC endpoint is required")
        };
    }

    if value.len() > MAX_URL_LENGTH {
        return Err("RPC endpoint too long");
    }

    let url = url::Url::parse(value).map_err(|_| "RPC endpoint is not a valid URL")?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err("RPC endpoint must use http or https");
    }

    if url.host_str().is_none() {
        return Err("RPC endpoint must include a host");
    }

    Ok(())
}

/// Validates a minimum-uptime percentage.
pub fn validate_min_uptime(value: f64) -> Result<(), &'static str> {
    if !value.is_finite() {
        return Err("Minimum uptime must be a number");
    }

    if value < 0.0 {
        return Err("Minimum uptime cannot be negative");
    }

    Ok(())
}

/// Escapes user or upstream text for HTML display
pub fn sanitize_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
