//! Environment variable handling and .env file management

use crate::config::split_list;
use crate::defaults;
use crate::error::{AppError, Result};
use crate::models::config::validate_endpoint_url;
use crate::types::{Network, ProbeKind};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    ///
    /// Variables already present in the process environment win over the file.
    pub fn load_env_file(debug: bool) -> Result<()> {
        if Path::new(".env").exists() {
            dotenv::from_filename(".env")
                .map_err(|e| AppError::config(format!("Failed to load .env file: {}", e)))?;

            if debug {
                eprintln!("Loaded configuration from .env file");
            }
        } else if debug {
            eprintln!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        format!(
            r#"# Sui RPC Latency Ranker Configuration
#
# Values here act as defaults and can be overridden by environment
# variables and command-line arguments.

# Network whose built-in endpoint list is probed (mainnet, testnet, devnet, localnet)
# SUI_NETWORK=mainnet

# Replace the built-in list entirely (comma-separated)
# RPC_ENDPOINTS=https://fullnode.mainnet.sui.io,https://sui-rpc.publicnode.com

# Extra endpoints appended after the base list (comma-separated)
# CUSTOM_RPC_ENDPOINTS=https://sui.obsuidian.xyz,https://sui.obsuidian.xyz:443,http://sui.obsuidian.xyz:80

# Endpoints kept in the list but skipped (comma-separated)
# EXCLUDE_RPC_ENDPOINTS=https://mainnet.suiet.app

# Total probe rounds per endpoint, warm-up included (2-{max_rounds})
# ROUNDS={rounds}

# Leading rounds discarded before statistics
# WARMUP_ROUNDS={warmup}

# Request used for probing (multiGetObjects, queryTransactionBlocks)
# PROBE_KIND=multiGetObjects

# Request timeout in seconds (1-{max_timeout})
# TIMEOUT_SECONDS={timeout}

# Requests in flight at once within a round
# MAX_CONCURRENCY=16

# Enable colored output (true/false)
# ENABLE_COLOR=true

# Example configurations for different scenarios:
#
# Ranking your own nodes against the public mainnet list:
# CUSTOM_RPC_ENDPOINTS=https://sui.obsuidian.xyz:2020,https://sui.obsuidian.xyz:443/json-rpc/
#
# Quick check of a local node:
# SUI_NETWORK=localnet
# ROUNDS=3
# TIMEOUT_SECONDS=2
"#,
            max_rounds = defaults::MAX_ROUNDS,
            rounds = defaults::DEFAULT_ROUNDS,
            warmup = defaults::DEFAULT_WARMUP_ROUNDS,
            max_timeout = defaults::MAX_TIMEOUT_SECS,
            timeout = defaults::DEFAULT_TIMEOUT.as_secs(),
        )
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        let content = Self::create_example_env_content();
        std::fs::write(path, content)
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))?;

        Ok(())
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "SUI_NETWORK" => {
                value.parse::<Network>()?;
            }
            "RPC_ENDPOINTS" | "CUSTOM_RPC_ENDPOINTS" | "EXCLUDE_RPC_ENDPOINTS" => {
                for url in split_list(value) {
                    validate_endpoint_url(&url)
                        .map_err(|e| AppError::config(format!("Invalid {} entry: {}", key, e)))?;
                }
            }
            "ROUNDS" => {
                let rounds: u32 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid ROUNDS value '{}': {}", value, e)))?;
                if !(defaults::MIN_ROUNDS..=defaults::MAX_ROUNDS).contains(&rounds) {
                    return Err(AppError::config(format!(
                        "ROUNDS must be between {} and {}, got: {}",
                        defaults::MIN_ROUNDS,
                        defaults::MAX_ROUNDS,
                        rounds
                    )));
                }
            }
            "WARMUP_ROUNDS" => {
                value
                    .parse::<u32>()
                    .map_err(|e| AppError::config(format!("Invalid WARMUP_ROUNDS value '{}': {}", value, e)))?;
            }
            "PROBE_KIND" => {
                value.parse::<ProbeKind>()?;
            }
            "TIMEOUT_SECONDS" => {
                let timeout: u64 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid TIMEOUT_SECONDS value '{}': {}", value, e)))?;
                if timeout == 0 || timeout > defaults::MAX_TIMEOUT_SECS {
                    return Err(AppError::config(format!(
                        "TIMEOUT_SECONDS must be between 1 and {}, got: {}",
                        defaults::MAX_TIMEOUT_SECS,
                        timeout
                    )));
                }
            }
            "MAX_CONCURRENCY" => {
                let concurrency: usize = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid MAX_CONCURRENCY value '{}': {}", value, e)))?;
                if concurrency == 0 {
                    return Err(AppError::config("MAX_CONCURRENCY must be at least 1"));
                }
            }
            "ENABLE_COLOR" => {
                value
                    .parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e)))?;
            }
            _ => {}
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("SUI_NETWORK", "Network for the built-in endpoint list", "mainnet"),
            ("RPC_ENDPOINTS", "Comma-separated list replacing the built-in endpoints", "https://fullnode.mainnet.sui.io"),
            ("CUSTOM_RPC_ENDPOINTS", "Comma-separated endpoints appended to the list", "https://my-node.example:443"),
            ("EXCLUDE_RPC_ENDPOINTS", "Comma-separated endpoints to skip", "https://mainnet.suiet.app"),
            ("ROUNDS", "Probe rounds including warm-up (2-100)", "11"),
            ("WARMUP_ROUNDS", "Leading rounds discarded before statistics", "1"),
            ("PROBE_KIND", "multiGetObjects or queryTransactionBlocks", "multiGetObjects"),
            ("TIMEOUT_SECONDS", "Request timeout in seconds (1-300)", "10"),
            ("MAX_CONCURRENCY", "Requests in flight at once within a round", "16"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<22} {}\n", var, description));
            help.push_str(&format!("  {:<22} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate `KEY=value` lines of a .env file, returning one warning per bad line
    pub fn check_env_content(content: &str) -> Vec<String> {
        let mut warnings = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let value = value.trim().trim_matches('"');
                if let Err(e) = Self::validate_env_var(key.trim(), value) {
                    warnings.push(format!("Line '{}': {}", line, e));
                }
            }
        }

        warnings
    }

    /// Check if .env file exists and validate its contents
    pub fn check_env_file(path: &Path) -> Result<Option<Vec<String>>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("Failed to read .env file: {}", e)))?;

        Ok(Some(Self::check_env_content(&content)))
    }
}
