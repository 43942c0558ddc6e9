//! Configuration for the DAPI client.

use std::time::Duration;

use crate::error::ConfigError;

/// Default JSON-RPC port exposed by masternodes.
pub const DEFAULT_JSON_RPC_PORT: u16 = 3000;

/// Default gRPC port exposed by masternodes.
pub const DEFAULT_GRPC_PORT: u16 = 3010;

/// Default per-attempt dispatch timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);

/// Default retry budget. `retries = 3` allows up to 4 dispatch attempts.
pub const DEFAULT_RETRIES: u32 = 3;

/// How long a cached masternode list stays fresh before a read triggers
/// a diff fetch.
pub const MASTERNODE_LIST_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Built-in seed services used until the first masternode list diff is
/// applied.
pub const DEFAULT_SEEDS: &[&str] = &[
    "seed-1.mainnet.networks.dash.org:9999",
    "seed-2.mainnet.networks.dash.org:9999",
    "seed-3.mainnet.networks.dash.org:9999",
    "seed-4.mainnet.networks.dash.org:9999",
];

/// Configuration for the DAPI client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Initial peer services ("host:port"), used to bootstrap discovery.
    pub seeds: Vec<String>,

    /// JSON-RPC port on masternodes.
    pub port: u16,

    /// gRPC port on masternodes.
    pub grpc_port: u16,

    /// Per-attempt dispatch timeout.
    pub timeout: Duration,

    /// Retry budget per logical call. `retries` failed dispatch attempts
    /// are tolerated before giving up, so `retries = 0` still performs
    /// exactly one attempt.
    pub retries: u32,

    /// Staleness bound for the cached masternode list.
    pub refresh_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            seeds: DEFAULT_SEEDS.iter().map(|s| (*s).to_owned()).collect(),
            port: DEFAULT_JSON_RPC_PORT,
            grpc_port: DEFAULT_GRPC_PORT,
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
            refresh_interval: MASTERNODE_LIST_REFRESH_INTERVAL,
        }
    }
}

impl ClientConfig {
    /// Create a configuration bootstrapped from the given seed services.
    pub fn new(seeds: Vec<String>) -> Self {
        Self {
            seeds,
            ..Self::default()
        }
    }

    /// Replace the seed list.
    pub fn with_seeds(mut self, seeds: Vec<String>) -> Self {
        self.seeds = seeds;
        self
    }

    /// Set the JSON-RPC port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the gRPC port.
    pub fn with_grpc_port(mut self, grpc_port: u16) -> Self {
        self.grpc_port = grpc_port;
        self
    }

    /// Set the per-attempt dispatch timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry budget.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the masternode list staleness bound.
    pub fn with_refresh_interval(mut self, refresh_interval: Duration) -> Self {
        self.refresh_interval = refresh_interval;
        self
    }

    /// Validate the configuration. Runs at construction time of the client
    /// and each transport so that invalid settings fail before any network
    /// activity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.seeds.is_empty() {
            return Err(ConfigError::NoSeeds);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.port, DEFAULT_JSON_RPC_PORT);
        assert_eq!(config.grpc_port, DEFAULT_GRPC_PORT);
        assert_eq!(config.retries, DEFAULT_RETRIES);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = ClientConfig::default().with_timeout(Duration::ZERO);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn empty_seed_list_is_rejected() {
        let config = ClientConfig::default().with_seeds(vec![]);
        assert!(matches!(config.validate(), Err(ConfigError::NoSeeds)));
    }
}
