//! RPC Latency Ranker
//!
//! Measures round-trip latency of Sui JSON-RPC endpoints over repeated
//! rounds, aggregates the samples into average/p50/p90 per endpoint and
//! ranks the endpoints fastest-first.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod probe;
pub mod runner;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Config, EndpointSelection, ProbeState, RankedList, RoundResult, Sample, SummaryResult};
pub use output::{ColoredFormatter, JsonFormatter, OutputFormatter, OutputFormatterFactory, PlainFormatter};
pub use probe::{LatencyProber, SuiRpcProber};
pub use runner::{RoundProgress, RoundRunner, RunOutcome};
pub use stats::LatencyAggregator;
pub use types::{Network, ProbeKind};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Version string with build metadata stamped by build.rs
pub fn long_version() -> String {
    let commit = option_env!("GIT_COMMIT").unwrap_or("unknown");
    let built = option_env!("BUILD_TIME").unwrap_or("unknown");
    format!("{} ({} built {})", VERSION, commit, built)
}

/// Default configuration values
pub mod defaults {
    use crate::types::Network;
    use std::time::Duration;

    /// The first round is the warm-up, so 11 rounds give 10 measured requests
    pub const DEFAULT_ROUNDS: u32 = 11;
    pub const DEFAULT_WARMUP_ROUNDS: u32 = 1;
    pub const MIN_ROUNDS: u32 = 2;
    pub const MAX_ROUNDS: u32 = 100;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
    pub const MAX_TIMEOUT_SECS: u64 = 300;
    pub const DEFAULT_ENABLE_COLOR: bool = true;
    pub const USER_AGENT: &str = concat!("rpc-latency-ranker/", env!("CARGO_PKG_VERSION"));

    pub const MAINNET_ENDPOINTS: &[&str] = &[
        "https://fullnode.mainnet.sui.io",
        "https://mainnet.suiet.app",
        "https://rpc-mainnet.suiscan.xyz",
        "https://mainnet.sui.rpcpool.com",
        "https://sui-mainnet.nodeinfra.com",
        "https://mainnet-rpc.sui.chainbase.online",
        "https://sui-mainnet-ca-1.cosmostation.io",
        "https://sui-mainnet-ca-2.cosmostation.io",
        "https://sui-mainnet-us-1.cosmostation.io",
        "https://sui-mainnet-us-2.cosmostation.io",
        "https://sui-mainnet.public.blastapi.io",
        "https://sui-rpc.publicnode.com",
    ];

    pub const TESTNET_ENDPOINTS: &[&str] = &[
        "https://fullnode.testnet.sui.io",
        "https://rpc-testnet.suiscan.xyz",
        "https://sui-testnet.nodeinfra.com",
        "https://testnet.suiet.app",
        "https://sui-testnet-endpoint.blockvision.org",
    ];

    pub const DEVNET_ENDPOINTS: &[&str] = &["https://fullnode.devnet.sui.io"];

    pub const LOCALNET_ENDPOINTS: &[&str] = &["http://127.0.0.1:9000"];

    /// Built-in endpoint list for a network
    pub fn endpoints_for(network: Network) -> &'static [&'static str] {
        match network {
            Network::Mainnet => MAINNET_ENDPOINTS,
            Network::Testnet => TESTNET_ENDPOINTS,
            Network::Devnet => DEVNET_ENDPOINTS,
            Network::Localnet => LOCALNET_ENDPOINTS,
        }
    }

    /// Requests in flight per round when not configured
    pub fn default_concurrency() -> usize {
        (num_cpus::get() * 8).clamp(8, 64)
    }
}
