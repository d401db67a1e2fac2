//! Command-line interface

use crate::defaults;
use crate::types::{Network, ProbeKind};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Sui RPC Latency Ranker - probe Sui JSON-RPC endpoints and rank them by latency
#[derive(Parser, Debug, Clone)]
#[command(name = "rlr")]
#[command(version, about, long_about = None)]
#[command(after_help = "Settings can also come from environment variables or a .env file; see --env-help.")]
pub struct Cli {
    /// Network whose built-in endpoint list is probed
    #[arg(long, value_parser = parse_network)]
    pub network: Option<Network>,

    /// Endpoint to probe instead of the built-in list (repeatable)
    #[arg(long = "endpoint", value_name = "URL", action = ArgAction::Append)]
    pub endpoints: Vec<String>,

    /// Extra endpoint appended to the list (repeatable)
    #[arg(long = "add-endpoint", value_name = "URL", action = ArgAction::Append)]
    pub add_endpoints: Vec<String>,

    /// Endpoint to skip (repeatable)
    #[arg(long = "exclude", value_name = "URL", action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Probe rounds per endpoint, warm-up included
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(defaults::MIN_ROUNDS as i64..=defaults::MAX_ROUNDS as i64))]
    pub rounds: Option<u32>,

    /// Leading rounds discarded before statistics
    #[arg(long)]
    pub warmup: Option<u32>,

    /// Request used for probing (multiGetObjects, queryTransactionBlocks)
    #[arg(long, value_parser = parse_probe_kind)]
    pub probe: Option<ProbeKind>,

    /// Request timeout in seconds
    #[arg(short, long, value_parser = parse_timeout)]
    pub timeout: Option<u64>,

    /// Requests in flight at once within a round
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub concurrency: Option<u64>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Print the endpoint list that would be probed and exit
    #[arg(long)]
    pub list_endpoints: bool,

    /// Write an example .env file to PATH and exit
    #[arg(long, value_name = "PATH")]
    pub init_env: Option<PathBuf>,

    /// Describe supported environment variables and exit
    #[arg(long)]
    pub env_help: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if let (Some(rounds), Some(warmup)) = (self.rounds, self.warmup) {
            if warmup >= rounds {
                return Err(format!(
                    "--warmup ({}) must be lower than --rounds ({})",
                    warmup, rounds
                ));
            }
        }

        Ok(())
    }

    /// Resolve the color setting; `configured` is the env/.env value
    pub fn use_colors(&self, configured: bool) -> bool {
        if self.color {
            true
        } else if self.no_color || self.json {
            false
        } else {
            configured && supports_color()
        }
    }

    /// Run the probe, as opposed to one of the informational modes
    pub fn is_probe_mode(&self) -> bool {
        !self.list_endpoints && self.init_env.is_none() && !self.env_help
    }
}

fn parse_network(s: &str) -> Result<Network, String> {
    s.parse().map_err(|e: crate::error::AppError| e.to_string())
}

fn parse_probe_kind(s: &str) -> Result<ProbeKind, String> {
    s.parse().map_err(|e: crate::error::AppError| e.to_string())
}

/// Parse timeout seconds, 1 to the maximum
fn parse_timeout(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid timeout: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid timeout: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Timeout must be greater than 0".to_string())
            } else if secs > defaults::MAX_TIMEOUT_SECS {
                Err(format!("Timeout cannot exceed {} seconds", defaults::MAX_TIMEOUT_SECS))
            } else {
                Ok(secs)
            }
        })
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    cfg!(unix)
}
