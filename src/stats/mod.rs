//! Latency aggregation: reduces per-round samples to ranked per-endpoint summaries
//!
//! Everything in this module is pure and synchronous. It operates on data the
//! prober has already collected and never fails: endpoints without usable
//! samples come out as failed summaries, not errors.

use crate::models::{RankedList, RoundResult, SummaryResult};
use std::cmp::Ordering;

/// Rounds discarded before aggregation to remove DNS/TLS setup bias
pub const DEFAULT_WARMUP_ROUNDS: usize = 1;

/// Percentile ranks reported for every endpoint
pub const P50: f64 = 0.5;
pub const P90: f64 = 0.9;

/// Arithmetic mean, NaN for an empty slice
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Linear-interpolated percentile between closest ranks
///
/// `percentile` is a fraction in `0.0..=1.0` (0.9 for p90). The input is not
/// reordered; sorting happens on a copy. Returns NaN for an empty slice.
pub fn percentile(values: &[f64], percentile: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile_sorted(&sorted, percentile)
}

/// Same as [`percentile`] for data that is already sorted ascending
pub fn percentile_sorted(sorted: &[f64], percentile: f64) -> f64 {
    if sorted.is_empty() || percentile.is_nan() {
        return f64::NAN;
    }

    let rank = percentile.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower_index = rank.floor() as usize;
    let upper_index = (rank.ceil() as usize).min(sorted.len() - 1);

    if lower_index == upper_index {
        return sorted[lower_index];
    }

    let lower_value = sorted[lower_index];
    let upper_value = sorted[upper_index];
    let weight = rank - lower_index as f64;
    lower_value + (upper_value - lower_value) * weight
}

/// Ordering used for ranking: failed last, otherwise ascending average
///
/// Two failed summaries compare equal so a stable sort keeps their order.
pub fn compare_summaries(a: &SummaryResult, b: &SummaryResult) -> Ordering {
    match (a.error, b.error) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
        (false, false) => a.average.total_cmp(&b.average),
    }
}

/// Sort summaries fastest-first with failed endpoints pushed to the end
pub fn rank(mut summaries: Vec<SummaryResult>) -> RankedList {
    summaries.sort_by(compare_summaries);
    RankedList::from_ranked(summaries)
}

/// Reduces collected rounds into summaries
#[derive(Debug, Clone, Copy)]
pub struct LatencyAggregator {
    warmup_rounds: usize,
}

impl Default for LatencyAggregator {
    fn default() -> Self {
        Self {
            warmup_rounds: DEFAULT_WARMUP_ROUNDS,
        }
    }
}

impl LatencyAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregator that discards `warmup_rounds` leading rounds
    pub fn with_warmup_rounds(warmup_rounds: usize) -> Self {
        Self { warmup_rounds }
    }

    pub fn warmup_rounds(&self) -> usize {
        self.warmup_rounds
    }

    /// Latencies for the endpoint at `index`, or `None` if it must be marked failed
    ///
    /// The scan stops at the first failure; successes before it are dropped.
    /// A round too short to hold `index` counts as a failure.
    pub fn collect_latencies(&self, index: usize, rounds: &[RoundResult]) -> Option<Vec<f64>> {
        let mut latencies = Vec::with_capacity(rounds.len().saturating_sub(self.warmup_rounds));

        for round in rounds.iter().skip(self.warmup_rounds) {
            match round.get(index).and_then(|sample| sample.latency()) {
                Some(ms) => latencies.push(ms),
                None => return None,
            }
        }

        if latencies.is_empty() {
            None
        } else {
            Some(latencies)
        }
    }

    /// Summary for a single endpoint at position `index` in every round
    pub fn summarize_endpoint(&self, endpoint: &str, index: usize, rounds: &[RoundResult]) -> SummaryResult {
        match self.collect_latencies(index, rounds) {
            Some(latencies) => {
                let mut sorted = latencies.clone();
                sorted.sort_by(f64::total_cmp);
                SummaryResult::success(
                    endpoint,
                    average(&latencies),
                    percentile_sorted(&sorted, P50),
                    percentile_sorted(&sorted, P90),
                )
            }
            None => SummaryResult::failed(endpoint),
        }
    }

    /// One summary per endpoint, in endpoint order
    pub fn aggregate(&self, rounds: &[RoundResult], endpoints: &[String]) -> Vec<SummaryResult> {
        endpoints
            .iter()
            .enumerate()
            .map(|(index, endpoint)| self.summarize_endpoint(endpoint, index, rounds))
            .collect()
    }

    /// Summaries for every endpoint, ranked fastest-first
    pub fn aggregate_and_rank(&self, rounds: &[RoundResult], endpoints: &[String]) -> RankedList {
        rank(self.aggregate(rounds, endpoints))
    }
}

/// Aggregate with the default warm-up policy
pub fn aggregate(rounds: &[RoundResult], endpoints: &[String]) -> Vec<SummaryResult> {
    LatencyAggregator::default().aggregate(rounds, endpoints)
}

/// Aggregate with the default warm-up policy and rank the result
pub fn aggregate_and_rank(rounds: &[RoundResult], endpoints: &[String]) -> RankedList {
    LatencyAggregator::default().aggregate_and_rank(rounds, endpoints)
}

#[cfg(test)]
mod comprehensive_tests;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sample;

    const EPS: f64 = 1e-9;

    fn round(samples: &[Option<f64>]) -> RoundResult {
        samples.iter().map(|s| Sample::from(*s)).collect()
    }

    fn endpoints(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_average_of_constant_sequence() {
        assert_eq!(average(&[7.0, 7.0, 7.0]), 7.0);
        assert!(average(&[]).is_nan());
    }

    #[test]
    fn test_percentile_single_element() {
        assert_eq!(percentile(&[42.0], P50), 42.0);
        assert_eq!(percentile(&[42.0], P90), 42.0);
    }

    #[test]
    fn test_percentile_interpolation() {
        // rank = 0.9 * 3 = 2.7, between 30 and 40 with weight 0.7
        assert!((percentile(&[10.0, 20.0, 30.0, 40.0], P90) - 37.0).abs() < EPS);
        // rank = 1.5, between 20 and 30
        assert!((percentile(&[40.0, 10.0, 30.0, 20.0], P50) - 25.0).abs() < EPS);
    }

    #[test]
    fn test_percentile_integral_rank() {
        assert_eq!(percentile(&[3.0, 1.0, 2.0], P50), 2.0);
        assert_eq!(percentile(&[3.0, 1.0, 2.0], 0.0), 1.0);
        assert_eq!(percentile(&[3.0, 1.0, 2.0], 1.0), 3.0);
    }

    #[test]
    fn test_percentile_does_not_reorder_input() {
        let data = vec![30.0, 10.0, 20.0];
        let _ = percentile(&data, P90);
        assert_eq!(data, vec![30.0, 10.0, 20.0]);
    }

    #[test]
    fn test_percentile_edge_inputs() {
        assert!(percentile(&[], P50).is_nan());
        assert!(percentile(&[1.0, 2.0], f64::NAN).is_nan());
        assert_eq!(percentile(&[1.0, 2.0], 5.0), 2.0);
    }

    #[test]
    fn test_warmup_round_is_discarded() {
        let rounds = vec![
            round(&[Some(5000.0)]),
            round(&[Some(100.0)]),
            round(&[Some(200.0)]),
        ];
        let summaries = aggregate(&rounds, &endpoints(&["a"]));
        assert!(!summaries[0].error);
        assert_eq!(summaries[0].average, 150.0);
    }

    #[test]
    fn test_failed_warmup_does_not_fail_endpoint() {
        let rounds = vec![round(&[None]), round(&[Some(10.0)]), round(&[Some(20.0)])];
        let summaries = aggregate(&rounds, &endpoints(&["a"]));
        assert!(!summaries[0].error);
        assert_eq!(summaries[0].p50, 15.0);
    }

    #[test]
    fn test_first_failure_stops_scan() {
        // Second round (first measured) fails; later successes are ignored.
        let rounds = vec![
            round(&[Some(10.0)]),
            round(&[None]),
            round(&[Some(10.0)]),
            round(&[Some(10.0)]),
        ];
        let summary = &aggregate(&rounds, &endpoints(&["a"]))[0];
        assert!(summary.error);
        assert!(summary.average.is_nan() && summary.p50.is_nan() && summary.p90.is_nan());
    }

    #[test]
    fn test_failure_after_successes_discards_them() {
        let rounds = vec![
            round(&[Some(10.0)]),
            round(&[Some(10.0)]),
            round(&[Some(10.0)]),
            round(&[None]),
        ];
        assert!(aggregate(&rounds, &endpoints(&["a"]))[0].error);
    }

    #[test]
    fn test_only_warmup_round_marks_all_failed() {
        let rounds = vec![round(&[Some(10.0), Some(20.0)])];
        let summaries = aggregate(&rounds, &endpoints(&["a", "b"]));
        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|s| s.error));
    }

    #[test]
    fn test_no_rounds_marks_all_failed() {
        let summaries = aggregate(&[], &endpoints(&["a"]));
        assert!(summaries[0].error);
    }

    #[test]
    fn test_empty_endpoint_list() {
        let rounds = vec![round(&[]), round(&[])];
        assert!(aggregate_and_rank(&rounds, &[]).is_empty());
    }

    #[test]
    fn test_short_round_counts_as_failure() {
        let rounds = vec![round(&[Some(1.0), Some(1.0)]), round(&[Some(1.0)])];
        let summaries = aggregate(&rounds, &endpoints(&["a", "b"]));
        assert!(!summaries[0].error);
        assert!(summaries[1].error);
    }

    #[test]
    fn test_ranking_order() {
        let rounds = vec![
            round(&[Some(0.0), Some(0.0), Some(0.0)]),
            round(&[Some(50.0), None, Some(30.0)]),
            round(&[Some(50.0), Some(1.0), Some(30.0)]),
        ];
        let ranked = aggregate_and_rank(&rounds, &endpoints(&["slow", "broken", "fast"]));
        let order: Vec<&str> = ranked.iter().map(|s| s.endpoint.as_str()).collect();
        assert_eq!(order, vec!["fast", "slow", "broken"]);
    }

    #[test]
    fn test_failed_entries_keep_relative_order() {
        let summaries = vec![
            SummaryResult::failed("x"),
            SummaryResult::success("ok", 5.0, 5.0, 5.0),
            SummaryResult::failed("y"),
            SummaryResult::failed("z"),
        ];
        let ranked = rank(summaries);
        let order: Vec<&str> = ranked.iter().map(|s| s.endpoint.as_str()).collect();
        assert_eq!(order, vec!["ok", "x", "y", "z"]);
    }

    #[test]
    fn test_custom_warmup() {
        let rounds = vec![round(&[Some(900.0)]), round(&[Some(800.0)]), round(&[Some(10.0)])];
        let agg = LatencyAggregator::with_warmup_rounds(2);
        assert_eq!(agg.warmup_rounds(), 2);
        assert_eq!(agg.aggregate(&rounds, &endpoints(&["a"]))[0].average, 10.0);

        let none = LatencyAggregator::with_warmup_rounds(0);
        assert_eq!(none.aggregate(&rounds, &endpoints(&["a"]))[0].average, 570.0);
    }

    #[test]
    fn test_summary_statistics_for_ten_rounds() {
        let mut rounds = vec![round(&[Some(1000.0)])];
        for ms in [100.0, 110.0, 120.0, 130.0, 140.0, 150.0, 160.0, 170.0, 180.0, 190.0] {
            rounds.push(round(&[Some(ms)]));
        }
        let s = &aggregate(&rounds, &endpoints(&["a"]))[0];
        assert!((s.average - 145.0).abs() < EPS);
        assert!((s.p50 - 145.0).abs() < EPS);
        // rank = 0.9 * 9 = 8.1 -> 180 + 10 * 0.1
        assert!((s.p90 - 181.0).abs() < EPS);
    }
}
