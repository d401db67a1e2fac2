//! Which endpoints get probed, and the view state of a probe run

use crate::models::RankedList;
use crate::types::ProbeKind;
use serde::{Deserialize, Serialize};

/// An endpoint URL and whether it takes part in the next run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcUrl {
    pub url: String,
    pub enabled: bool,
}

/// Ordered endpoint list: a base list merged with custom entries
///
/// The order established here is the endpoint order of every round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSelection {
    rpcs: Vec<RpcUrl>,
}

impl EndpointSelection {
    /// Build a selection from a base list, all enabled, duplicates dropped
    pub fn new<I, S>(base: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::default();
        for url in base {
            selection.add_custom(url);
        }
        selection
    }

    /// Append a custom endpoint; returns false if it was already listed
    pub fn add_custom(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        if self.contains(&url) {
            return false;
        }
        self.rpcs.push(RpcUrl { url, enabled: true });
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.rpcs.iter().any(|rpc| rpc.url == url)
    }

    /// Flip the enabled flag of `url`; returns the new state
    pub fn toggle(&mut self, url: &str) -> Option<bool> {
        let rpc = self.rpcs.iter_mut().find(|rpc| rpc.url == url)?;
        rpc.enabled = !rpc.enabled;
        Some(rpc.enabled)
    }

    /// Set the enabled flag of `url`; returns false if it is not listed
    pub fn set_enabled(&mut self, url: &str, enabled: bool) -> bool {
        match self.rpcs.iter_mut().find(|rpc| rpc.url == url) {
            Some(rpc) => {
                rpc.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Enabled endpoint URLs in selection order
    pub fn enabled_urls(&self) -> Vec<String> {
        self.rpcs
            .iter()
            .filter(|rpc| rpc.enabled)
            .map(|rpc| rpc.url.clone())
            .collect()
    }

    pub fn rpcs(&self) -> &[RpcUrl] {
        &self.rpcs
    }

    pub fn len(&self) -> usize {
        self.rpcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rpcs.is_empty()
    }
}

/// Mutable view state of the tool between and during runs
#[derive(Debug, Clone, Default)]
pub struct ProbeState {
    pub probe_kind: ProbeKind,
    pub is_running: bool,
    /// Percent complete, 0.0 to 100.0
    pub progress: f64,
    pub results: RankedList,
}

impl ProbeState {
    pub fn new(probe_kind: ProbeKind) -> Self {
        Self {
            probe_kind,
            ..Default::default()
        }
    }

    pub fn set_probe_kind(&mut self, probe_kind: ProbeKind) {
        self.probe_kind = probe_kind;
    }

    pub fn start(&mut self) {
        self.is_running = true;
        self.progress = 0.0;
    }

    pub fn set_progress(&mut self, percent: f64) {
        self.progress = percent.clamp(0.0, 100.0);
    }

    /// Store ranked results; earlier results stay visible until this point
    pub fn finish(&mut self, results: RankedList) {
        self.results = results;
        self.is_running = false;
    }
}
