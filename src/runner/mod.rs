//! Round runner: probes all endpoints for a number of rounds, then aggregates
//!
//! Rounds run one after another; within a round the prober decides how
//! requests overlap. Progress is reported to the caller after every round.

use crate::{
    logging::RunLogger,
    models::{Config, ProbeState, RankedList, RoundResult},
    probe::LatencyProber,
    stats::LatencyAggregator,
    types::ProbeKind,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Progress notification sent before the first round and after each round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundProgress {
    /// Rounds completed so far
    pub completed: usize,
    pub total: usize,
    /// Percent complete, 0.0 to 100.0
    pub percent: f64,
}

impl RoundProgress {
    pub fn new(completed: usize, total: usize) -> Self {
        Self {
            completed,
            total,
            percent: progress_percent(completed, total),
        }
    }

    pub fn is_done(&self) -> bool {
        self.completed >= self.total
    }
}

/// Progress shown after `completed` of `total` rounds
///
/// The bar starts half a round in so that it moves as soon as a run begins:
/// 0.5/total before any round, (completed + 0.5)/total afterwards, capped at 100.
pub fn progress_percent(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    let percent = (completed as f64 + 0.5) / total as f64 * 100.0;
    percent.min(100.0)
}

/// Everything a finished run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub probe_kind: ProbeKind,
    /// Endpoints in probing order
    pub endpoints: Vec<String>,
    /// Raw rounds, warm-up included
    pub rounds: Vec<RoundResult>,
    pub warmup_rounds: usize,
    pub results: RankedList,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunOutcome {
    pub fn measured_rounds(&self) -> usize {
        self.rounds.len().saturating_sub(self.warmup_rounds)
    }

    pub fn duration(&self) -> std::time::Duration {
        (self.finished_at - self.started_at).to_std().unwrap_or_default()
    }
}

/// Drives a prober through a fixed number of rounds
#[derive(Clone)]
pub struct RoundRunner {
    prober: Arc<dyn LatencyProber>,
    rounds: usize,
    probe_kind: ProbeKind,
    aggregator: LatencyAggregator,
    logger: Option<RunLogger>,
}

impl std::fmt::Debug for RoundRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundRunner")
            .field("rounds", &self.rounds)
            .field("probe_kind", &self.probe_kind)
            .field("aggregator", &self.aggregator)
            .finish_non_exhaustive()
    }
}

impl RoundRunner {
    pub fn new(prober: Arc<dyn LatencyProber>, rounds: usize) -> Self {
        Self {
            prober,
            rounds,
            probe_kind: ProbeKind::default(),
            aggregator: LatencyAggregator::default(),
            logger: None,
        }
    }

    /// Runner with rounds, warm-up and probe kind taken from the config
    pub fn from_config(prober: Arc<dyn LatencyProber>, config: &Config) -> Self {
        Self::new(prober, config.rounds as usize)
            .with_warmup_rounds(config.warmup_rounds as usize)
            .with_probe_kind(config.probe_kind)
    }

    pub fn with_warmup_rounds(mut self, warmup_rounds: usize) -> Self {
        self.aggregator = LatencyAggregator::with_warmup_rounds(warmup_rounds);
        self
    }

    /// Probe kind recorded in the outcome
    pub fn with_probe_kind(mut self, probe_kind: ProbeKind) -> Self {
        self.probe_kind = probe_kind;
        self
    }

    pub fn with_logger(mut self, logger: RunLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Probe `endpoints` for every round and rank the result
    pub async fn run<F>(&self, endpoints: &[String], mut on_progress: F) -> RunOutcome
    where
        F: FnMut(RoundProgress),
    {
        let started_at = Utc::now();
        if let Some(logger) = &self.logger {
            logger
                .log_run_start(endpoints.len(), self.rounds as u32, self.probe_kind.name())
                .await;
        }

        on_progress(RoundProgress::new(0, self.rounds));

        let mut rounds = Vec::with_capacity(self.rounds);
        for index in 0..self.rounds {
            let round = self.prober.probe_round(endpoints).await;
            let progress = RoundProgress::new(index + 1, self.rounds);

            if let Some(logger) = &self.logger {
                logger
                    .log_round(index + 1, self.rounds, round.failure_count(), progress.percent)
                    .await;
            }

            rounds.push(round);
            on_progress(progress);
        }

        let results = self.aggregator.aggregate_and_rank(&rounds, endpoints);
        let finished_at = Utc::now();

        let outcome = RunOutcome {
            probe_kind: self.probe_kind,
            endpoints: endpoints.to_vec(),
            rounds,
            warmup_rounds: self.aggregator.warmup_rounds(),
            results,
            started_at,
            finished_at,
        };

        if let Some(logger) = &self.logger {
            logger.log_run_complete(&outcome.results, outcome.duration()).await;
        }

        outcome
    }

    /// Run while keeping a [`ProbeState`] up to date
    pub async fn run_with_state(&self, endpoints: &[String], state: &mut ProbeState) -> RunOutcome {
        state.start();
        let outcome = self.run(endpoints, |p| state.set_progress(p.percent)).await;
        state.finish(outcome.results.clone());
        outcome
    }
}
