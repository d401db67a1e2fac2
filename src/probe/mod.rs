//! Latency probing of JSON-RPC endpoints
//!
//! A prober issues one request to every endpoint per round and reports each
//! outcome as a [`Sample`]. Failures are data: a probe never returns an
//! error for an unreachable or misbehaving endpoint.

pub mod request;


use crate::{
    defaults,
    error::{AppError, Result},
    logging::ProbeLogger,
    models::{Config, RoundResult, Sample},
    types::ProbeKind,
};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use request::{build_request, JsonRpcResponse};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Source of per-round latency samples
#[async_trait]
pub trait LatencyProber: Send + Sync {
    /// Probe every endpoint once; the result has one sample per endpoint, in order
    async fn probe_round(&self, endpoints: &[String]) -> RoundResult;
}

/// Prober that times Sui JSON-RPC calls over HTTP
#[derive(Debug)]
pub struct SuiRpcProber {
    client: Client,
    probe_kind: ProbeKind,
    timeout: Duration,
    max_concurrency: usize,
    request_id: AtomicU64,
    logger: Option<ProbeLogger>,
}

impl SuiRpcProber {
    pub fn new(probe_kind: ProbeKind, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(defaults::USER_AGENT)
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            probe_kind,
            timeout,
            max_concurrency: defaults::default_concurrency(),
            request_id: AtomicU64::new(1),
            logger: None,
        })
    }

    /// Prober configured from the application config
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.probe_kind, config.timeout())?.with_max_concurrency(config.max_concurrency))
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn with_logger(mut self, logger: ProbeLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn probe_kind(&self) -> ProbeKind {
        self.probe_kind
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Time one request against `endpoint`
    pub async fn measure(&self, endpoint: &str) -> Sample {
        let body = build_request(self.probe_kind, self.next_id());

        let start = Instant::now();
        let outcome = match tokio::time::timeout(self.timeout, self.call(endpoint, &body)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::timeout(format!(
                "no response within {}ms",
                self.timeout.as_millis()
            ))),
        };
        let elapsed = start.elapsed();

        let (sample, error) = match outcome {
            Ok(()) => (Sample::Latency(elapsed.as_secs_f64() * 1000.0), None),
            Err(e) => (Sample::Failed, Some(e)),
        };

        if let Some(logger) = &self.logger {
            logger.log_probe(endpoint, &sample, elapsed, error.as_ref()).await;
        }

        sample
    }

    /// Send the request and read the full response; any RPC-level error fails the call
    async fn call(&self, endpoint: &str, body: &request::JsonRpcRequest) -> Result<()> {
        let response = self.client.post(endpoint).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::http_request(format!("HTTP status {}", status)));
        }

        let bytes = response.bytes().await?;
        let parsed: JsonRpcResponse = serde_json::from_slice(&bytes)?;

        if let Some(err) = parsed.error {
            return Err(AppError::rpc(err.to_string()));
        }
        if parsed.result.is_none() {
            return Err(AppError::rpc("response carries neither result nor error"));
        }

        Ok(())
    }
}

#[async_trait]
impl LatencyProber for SuiRpcProber {
    async fn probe_round(&self, endpoints: &[String]) -> RoundResult {
        // `buffered` keeps output in input order while requests overlap.
        let samples: Vec<Sample> = futures::stream::iter(endpoints.iter().cloned())
            .map(|endpoint| async move { self.measure(&endpoint).await })
            .buffered(self.max_concurrency)
            .collect()
            .await;

        RoundResult::new(samples)
    }
}
