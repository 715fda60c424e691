// src/services/simulation.rs
//
// Telemetry jitter for demo deployments. Only wired in when
// SIMULATE_TELEMETRY is set; the live fetch path never touches it.
use rand::Rng;

use crate::models::Node;
use crate::utils::format::round_to;

const UPTIME_BASELINE: f64 = 99.0;
const UPTIME_JITTER: f64 = 0.01;
const STORAGE_BASELINE_CAPACITY: f64 = 1000.0;
const STORAGE_JITTER: f64 = 5.0;

pub trait Simulator: Send + Sync {
    /// Return a perturbed copy of `node`.
    fn perturb(&self, node: &Node) -> Node;
}

/// Small random walk on uptime and used storage, clamped to valid ranges.
#[derive(Debug, Default, Clone, Copy)]
pub struct JitterSimulator;

impl JitterSimulator {
    pub fn perturb_with<R: Rng + ?Sized>(&self, rng: &mut R, node: &Node) -> Node {
        let uptime = node.uptime.unwrap_or(UPTIME_BASELINE) + (rng.gen::<f64>() - 0.5) * UPTIME_JITTER;
        let uptime = round_to(uptime.clamp(0.0, 100.0), 3);

        let capacity = node.storage_capacity.unwrap_or(STORAGE_BASELINE_CAPACITY);
        let used = node.storage_used.unwrap_or(0.0) + (rng.gen::<f64>() - 0.5) * STORAGE_JITTER;
        let used = round_to(used.clamp(0.0, capacity.max(0.0)), 1).min(capacity);

        Node {
            uptime: Some(uptime),
            storage_used: Some(used),
            ..node.clone()
        }
    }
}

impl Simulator for JitterSimulator {
    fn perturb(&self, node: &Node) -> Node {
        self.perturb_with(&mut rand::thread_rng(), node)
    }
}
