//! Configuration data model and validation

use crate::defaults;
use crate::models::EndpointSelection;
use crate::types::{AppError, Network, ProbeKind, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Network whose built-in endpoint list is used
    #[serde(default)]
    pub network: Network,

    /// Base endpoint list; empty means the network's built-in list
    #[serde(default)]
    pub endpoints: Vec<String>,

    /// Extra endpoints merged after the base list
    #[serde(default)]
    pub custom_endpoints: Vec<String>,

    /// Endpoints kept in the list but disabled
    #[serde(default)]
    pub excluded_endpoints: Vec<String>,

    /// Probe rounds, including warm-up rounds
    #[serde(default = "default_rounds")]
    pub rounds: u32,

    /// Leading rounds discarded before aggregation
    #[serde(default = "default_warmup_rounds")]
    pub warmup_rounds: u32,

    #[serde(default)]
    pub probe_kind: ProbeKind,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,

    /// Requests in flight at once within a round
    #[serde(default = "defaults::default_concurrency")]
    pub max_concurrency: usize,

    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Emit results as JSON instead of a table
    #[serde(default)]
    pub json_output: bool,

    #[serde(default)]
    pub verbose: bool,

    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: Network::default(),
            endpoints: Vec::new(),
            custom_endpoints: Vec::new(),
            excluded_endpoints: Vec::new(),
            rounds: default_rounds(),
            warmup_rounds: default_warmup_rounds(),
            probe_kind: ProbeKind::default(),
            timeout_seconds: default_timeout_secs(),
            max_concurrency: defaults::default_concurrency(),
            enable_color: default_enable_color(),
            json_output: false,
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Rounds whose samples end up in the statistics
    pub fn measured_rounds(&self) -> u32 {
        self.rounds.saturating_sub(self.warmup_rounds)
    }

    /// Base endpoint list, falling back to the network's built-in list
    pub fn base_endpoints(&self) -> Vec<String> {
        if self.endpoints.is_empty() {
            defaults::endpoints_for(self.network)
                .iter()
                .map(|s| s.to_string())
                .collect()
        } else {
            self.endpoints.clone()
        }
    }

    /// Endpoint selection: base list, then custom entries, exclusions disabled
    pub fn selection(&self) -> EndpointSelection {
        let mut selection = EndpointSelection::new(self.base_endpoints());
        for url in &self.custom_endpoints {
            selection.add_custom(url.clone());
        }
        for url in &self.excluded_endpoints {
            selection.set_enabled(url, false);
        }
        selection
    }

    /// Validate the configuration and return the first hard error
    pub fn validate(&self) -> Result<()> {
        for url in self.endpoints.iter().chain(&self.custom_endpoints) {
            validate_endpoint_url(url)?;
        }

        if self.warmup_rounds >= self.rounds {
            return Err(AppError::config(format!(
                "Rounds ({}) must exceed warm-up rounds ({}) so that at least one round is measured",
                self.rounds, self.warmup_rounds
            )));
        }

        if self.rounds < defaults::MIN_ROUNDS {
            return Err(AppError::config(format!("Rounds must be at least {}", defaults::MIN_ROUNDS)));
        }

        if self.rounds > defaults::MAX_ROUNDS {
            return Err(AppError::config(format!("Rounds cannot exceed {}", defaults::MAX_ROUNDS)));
        }

        if self.timeout_seconds == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if self.timeout_seconds > defaults::MAX_TIMEOUT_SECS {
            return Err(AppError::config(format!(
                "Timeout cannot exceed {} seconds",
                defaults::MAX_TIMEOUT_SECS
            )));
        }

        if self.max_concurrency == 0 {
            return Err(AppError::config("Concurrency must be greater than 0"));
        }

        if self.selection().enabled_urls().is_empty() {
            return Err(AppError::config("No endpoints left to test after exclusions"));
        }

        Ok(())
    }

    /// Merge process environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        self.merge_from_lookup(|key| std::env::var(key).ok())
    }

    /// Merge variables provided by `lookup` into this configuration
    pub fn merge_from_lookup<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(network) = lookup("SUI_NETWORK") {
            self.network = network.parse()?;
        }

        if let Some(endpoints) = lookup("RPC_ENDPOINTS") {
            self.endpoints = split_list(&endpoints);
        }

        if let Some(custom) = lookup("CUSTOM_RPC_ENDPOINTS") {
            self.custom_endpoints = split_list(&custom);
        }

        if let Some(excluded) = lookup("EXCLUDE_RPC_ENDPOINTS") {
            self.excluded_endpoints = split_list(&excluded);
        }

        if let Some(rounds) = lookup("ROUNDS") {
            self.rounds = rounds
                .trim()
                .parse()
                .map_err(|e| AppError::config(format!("Invalid ROUNDS value '{}': {}", rounds, e)))?;
        }

        if let Some(warmup) = lookup("WARMUP_ROUNDS") {
            self.warmup_rounds = warmup
                .trim()
                .parse()
                .map_err(|e| AppError::config(format!("Invalid WARMUP_ROUNDS value '{}': {}", warmup, e)))?;
        }

        if let Some(kind) = lookup("PROBE_KIND") {
            self.probe_kind = kind.parse()?;
        }

        if let Some(timeout) = lookup("TIMEOUT_SECONDS") {
            self.timeout_seconds = timeout
                .trim()
                .parse()
                .map_err(|e| AppError::config(format!("Invalid TIMEOUT_SECONDS value '{}': {}", timeout, e)))?;
        }

        if let Some(concurrency) = lookup("MAX_CONCURRENCY") {
            self.max_concurrency = concurrency.trim().parse().map_err(|e| {
                AppError::config(format!("Invalid MAX_CONCURRENCY value '{}': {}", concurrency, e))
            })?;
        }

        if let Some(enable_color) = lookup("ENABLE_COLOR") {
            self.enable_color = enable_color
                .trim()
                .parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

/// Endpoint URLs must parse and use http or https
pub fn validate_endpoint_url(url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(AppError::config("Endpoint URL cannot be empty"));
    }

    let parsed = url::Url::parse(url)
        .map_err(|e| AppError::config(format!("Invalid endpoint URL '{}': {}", url, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(AppError::config(format!(
            "Endpoint URL '{}' must use http or https, not {}",
            url, scheme
        ))),
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn default_rounds() -> u32 {
    defaults::DEFAULT_ROUNDS
}

fn default_warmup_rounds() -> u32 {
    defaults::DEFAULT_WARMUP_ROUNDS
}

fn default_timeout_secs() -> u64 {
    defaults::DEFAULT_TIMEOUT.as_secs()
}

fn default_enable_color() -> bool {
    defaults::DEFAULT_ENABLE_COLOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.rounds, 11);
        assert_eq!(config.measured_rounds(), 10);
        assert_eq!(config.network, Network::Mainnet);
        assert!(config.validate().is_ok());
        assert_eq!(config.base_endpoints().len(), defaults::MAINNET_ENDPOINTS.len());
    }

    #[test]
    fn test_selection_merges_custom_and_exclusions() {
        let config = Config {
            endpoints: vec!["https://a".into(), "https://b".into()],
            custom_endpoints: vec!["https://b".into(), "http://c:9000".into()],
            excluded_endpoints: vec!["https://a".into()],
            ..Config::default()
        };
        let selection = config.selection();
        assert_eq!(selection.len(), 3);
        assert_eq!(selection.enabled_urls(), vec!["https://b", "http://c:9000"]);
    }

    #[test]
    fn test_network_default_lists() {
        let config = Config {
            network: Network::Localnet,
            ..Config::default()
        };
        assert_eq!(config.base_endpoints(), vec!["http://127.0.0.1:9000"]);
    }

    #[test]
    fn test_validation_errors() {
        let too_few = Config {
            rounds: 1,
            ..Config::default()
        };
        assert!(too_few.validate().is_err());

        let single_round_without_warmup = Config {
            rounds: 1,
            warmup_rounds: 0,
            ..Config::default()
        };
        assert!(single_round_without_warmup.validate().is_err());

        let warmup_swallows_all = Config {
            rounds: 3,
            warmup_rounds: 3,
            ..Config::default()
        };
        assert!(warmup_swallows_all.validate().is_err());

        let bad_scheme = Config {
            endpoints: vec!["ws://node".into()],
            ..Config::default()
        };
        assert!(bad_scheme.validate().is_err());

        let zero_timeout = Config {
            timeout_seconds: 0,
            ..Config::default()
        };
        assert!(zero_timeout.validate().is_err());

        let all_excluded = Config {
            endpoints: vec!["https://a".into()],
            excluded_endpoints: vec!["https://a".into()],
            ..Config::default()
        };
        assert!(all_excluded.validate().is_err());
    }

    #[test]
    fn test_merge_from_lookup() {
        let mut config = Config::default();
        config
            .merge_from_lookup(lookup_from(&[
                ("SUI_NETWORK", "testnet"),
                ("CUSTOM_RPC_ENDPOINTS", "https://x, ,https://y"),
                ("ROUNDS", "6"),
                ("PROBE_KIND", "queryTransactionBlocks"),
                ("TIMEOUT_SECONDS", "4"),
                ("MAX_CONCURRENCY", "2"),
                ("ENABLE_COLOR", "false"),
            ]))
            .unwrap();

        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.custom_endpoints, vec!["https://x", "https://y"]);
        assert_eq!(config.rounds, 6);
        assert_eq!(config.probe_kind, ProbeKind::QueryTransactionBlocks);
        assert_eq!(config.timeout(), Duration::from_secs(4));
        assert_eq!(config.max_concurrency, 2);
        assert!(!config.enable_color);
    }

    #[test]
    fn test_merge_from_lookup_rejects_garbage() {
        let mut config = Config::default();
        assert!(config.merge_from_lookup(lookup_from(&[("ROUNDS", "many")])).is_err());
        assert!(config.merge_from_lookup(lookup_from(&[("SUI_NETWORK", "moon")])).is_err());
        assert!(config.merge_from_lookup(lookup_from(&[("ENABLE_COLOR", "yes")])).is_err());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" a ,b,,c "), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }
}
