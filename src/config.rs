// src/config.rs
use anyhow::Context;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PRPC_ENDPOINT: &str = "https://api.xandeum.network";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub prpc_endpoint: String,
    pub prpc_timeout_secs: u64,
    pub request_deadline_secs: u64,
    pub poll_interval_secs: u64,
    pub simulate_telemetry: bool,
    pub simulation_interval_secs: u64,
    pub data_dir: PathBuf,
    pub rate_limit_per_minute: usize,
    pub trust_proxy_headers: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            prpc_endpoint: DEFAULT_PRPC_ENDPOINT.to_string(),
            prpc_timeout_secs: 10,
            request_deadline_secs: 15,
            poll_interval_secs: 30,
            simulate_telemetry: false,
            simulation_interval_secs: 3,
            data_dir: PathBuf::from("data"),
            rate_limit_per_minute: 300,
            trust_proxy_headers: false,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: env_parse("PORT", defaults.port)?,
            prpc_endpoint: std::env::var("PRPC_ENDPOINT")
                .unwrap_or(defaults.prpc_endpoint),
            prpc_timeout_secs: env_parse("PRPC_TIMEOUT_SECS", defaults.prpc_timeout_secs)?,
            request_deadline_secs: env_parse("REQUEST_DEADLINE_SECS", defaults.request_deadline_secs)?,
            poll_interval_secs: env_parse("POLL_INTERVAL_SECS", defaults.poll_interval_secs)?,
            simulate_telemetry: env_parse("SIMULATE_TELEMETRY", defaults.simulate_telemetry)?,
            simulation_interval_secs: env_parse(
                "SIMULATION_INTERVAL_SECS",
                defaults.simulation_interval_secs,
            )?,
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            rate_limit_per_minute: env_parse("RATE_LIMIT_PER_MINUTE", defaults.rate_limit_per_minute)?,
            trust_proxy_headers: env_parse("TRUST_PROXY_HEADERS", defaults.trust_proxy_headers)?,
        })
    }

    pub fn server_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid server address {}:{}", self.host, self.port))
    }

    pub fn prpc_timeout(&self) -> Duration {
        Duration::from_secs(self.prpc_timeout_secs)
    }

    pub fn request_deadline(&self) -> Duration {
        Duration::from_secs(self.request_deadline_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn simulation_interval(&self) -> Duration {
        Duration::from_secs(self.simulation_interval_secs.max(1))
    }
}

fn env_parse<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", key, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.prpc_endpoint, DEFAULT_PRPC_ENDPOINT);
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
        assert_eq!(config.simulation_interval(), Duration::from_secs(3));
        assert!(!config.simulate_telemetry);
        assert!(!config.trust_proxy_headers);
        assert_eq!(config.server_addr().unwrap().port(), 3000);
    }

    #[test]
    fn test_env_parse() {
        std::env::set_var("PNODE_TEST_POLL", " 45 ");
        std::env::set_var("PNODE_TEST_BAD", "often");
        assert_eq!(env_parse("PNODE_TEST_POLL", 30u64).unwrap(), 45);
        assert!(env_parse("PNODE_TEST_BAD", false).is_err());
        assert_eq!(env_parse("PNODE_TEST_UNSET", 7u64).unwrap(), 7);
    }

    #[test]
    fn test_invalid_host_is_an_error() {
        let config = Config {
            host: "not a host".into(),
            ..Config::default()
        };
        assert!(config.server_addr().is_err());
    }
}
