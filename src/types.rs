//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Kind of JSON-RPC request issued against every endpoint in a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProbeKind {
    /// `sui_multiGetObjects` for 20 random object ids
    #[default]
    #[serde(rename = "multiGetObjects")]
    MultiGetObjects,
    /// `suix_queryTransactionBlocks` filtered by a Move function
    #[serde(rename = "queryTransactionBlocks")]
    QueryTransactionBlocks,
}

impl ProbeKind {
    pub const ALL: [ProbeKind; 2] = [ProbeKind::MultiGetObjects, ProbeKind::QueryTransactionBlocks];

    /// Name shown to users and accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            ProbeKind::MultiGetObjects => "multiGetObjects",
            ProbeKind::QueryTransactionBlocks => "queryTransactionBlocks",
        }
    }

    /// JSON-RPC method sent on the wire
    pub fn rpc_method(&self) -> &'static str {
        match self {
            ProbeKind::MultiGetObjects => "sui_multiGetObjects",
            ProbeKind::QueryTransactionBlocks => "suix_queryTransactionBlocks",
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProbeKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "multigetobjects" | "objects" => Ok(ProbeKind::MultiGetObjects),
            "querytransactionblocks" | "transactions" | "txs" => Ok(ProbeKind::QueryTransactionBlocks),
            _ => Err(AppError::parse(format!(
                "Invalid probe kind '{}', expected multiGetObjects or queryTransactionBlocks",
                s
            ))),
        }
    }
}

/// Sui network whose default endpoint list is probed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    Devnet,
    Localnet,
}

impl Network {
    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Localnet => "localnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "localnet" | "local" => Ok(Network::Localnet),
            _ => Err(AppError::parse(format!("Invalid network: {}", s))),
        }
    }
}
