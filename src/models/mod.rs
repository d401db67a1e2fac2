//! Data models and structures for the RPC latency ranker

pub mod config;
pub mod sample;
pub mod selection;
pub mod summary;

// Re-export main model types
pub use config::Config;
pub use sample::{RoundResult, Sample};
pub use selection::{EndpointSelection, ProbeState, RpcUrl};
pub use summary::{RankedList, SummaryResult};
