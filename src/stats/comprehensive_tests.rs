//! Property-based tests for latency aggregation
//!
//! These cover invariants that must hold for arbitrary prober output rather
//! than hand-picked examples.

use super::*;
use crate::models::Sample;
use proptest::collection::vec;
use proptest::prelude::*;

/// Property-based test generators
mod generators {
    use super::*;

    pub fn sample() -> impl Strategy<Value = Sample> {
        prop_oneof![
            4 => (1.0f64..5000.0).prop_map(Sample::Latency),
            1 => Just(Sample::Failed),
        ]
    }

    pub fn round(width: usize) -> impl Strategy<Value = RoundResult> {
        vec(sample(), width).prop_map(RoundResult::new)
    }

    /// Endpoint names plus rounds that all have one sample per endpoint
    pub fn run() -> impl Strategy<Value = (Vec<String>, Vec<RoundResult>)> {
        (0usize..6, 1usize..8).prop_flat_map(|(width, rounds)| {
            (
                Just((0..width).map(|i| format!("https://rpc-{}.example", i)).collect::<Vec<_>>()),
                vec(round(width), rounds),
            )
        })
    }

    pub fn latencies() -> impl Strategy<Value = Vec<f64>> {
        vec(0.5f64..10000.0, 1..40)
    }
}

proptest! {
    #[test]
    fn output_is_permutation_of_endpoints((endpoints, rounds) in generators::run()) {
        let ranked = aggregate_and_rank(&rounds, &endpoints);
        prop_assert_eq!(ranked.len(), endpoints.len());

        let mut seen: Vec<String> = ranked.iter().map(|s| s.endpoint.clone()).collect();
        let mut expected = endpoints.clone();
        seen.sort();
        expected.sort();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn ranking_rule_holds((endpoints, rounds) in generators::run()) {
        let ranked = aggregate_and_rank(&rounds, &endpoints);
        let entries = ranked.as_slice();

        for pair in entries.windows(2) {
            // No success after a failure.
            prop_assert!(!(pair[0].error && !pair[1].error));
            if !pair[0].error && !pair[1].error {
                prop_assert!(pair[0].average <= pair[1].average);
            }
        }
    }

    #[test]
    fn warmup_round_never_influences_results(
        (endpoints, rounds) in generators::run(),
        replacement in vec(generators::sample(), 0..6),
    ) {
        let mut replaced = rounds.clone();
        let width = endpoints.len();
        let mut warmup: Vec<Sample> = replacement.into_iter().take(width).collect();
        warmup.resize(width, Sample::Failed);
        replaced[0] = RoundResult::new(warmup);

        prop_assert_eq!(aggregate(&rounds, &endpoints), aggregate(&replaced, &endpoints));
    }

    #[test]
    fn any_measured_failure_marks_endpoint_failed((endpoints, rounds) in generators::run()) {
        let summaries = aggregate(&rounds, &endpoints);
        for (i, summary) in summaries.iter().enumerate() {
            let failed_somewhere = rounds.iter().skip(1).any(|r| r.get(i).map_or(true, Sample::is_failed));
            let measured = rounds.len() > 1;
            prop_assert_eq!(summary.error, failed_somewhere || !measured);
            if summary.error {
                prop_assert!(summary.average.is_nan() && summary.p50.is_nan() && summary.p90.is_nan());
            }
        }
    }

    #[test]
    fn statistics_within_sample_bounds(latencies in generators::latencies()) {
        let min = latencies.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = latencies.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let mean = average(&latencies);
        let p50 = percentile(&latencies, P50);
        let p90 = percentile(&latencies, P90);

        prop_assert!(mean >= min - 1e-9 && mean <= max + 1e-9);
        prop_assert!(p50 >= min && p50 <= max);
        prop_assert!(p90 >= min && p90 <= max);
        prop_assert!(p50 <= p90);
    }

    #[test]
    fn constant_sequence_statistics(value in 0.5f64..10000.0, len in 1usize..30) {
        let data = std::iter::repeat(value).take(len).collect::<Vec<_>>();
        prop_assert!((average(&data) - value).abs() <= value * 1e-12);
        prop_assert_eq!(percentile(&data, P50), value);
        prop_assert_eq!(percentile(&data, P90), value);
    }

    #[test]
    fn percentile_is_order_independent(mut latencies in generators::latencies()) {
        let before = percentile(&latencies, P90);
        latencies.reverse();
        prop_assert_eq!(before, percentile(&latencies, P90));
    }
}

#[test]
fn all_endpoints_failed_is_a_valid_result() {
    let endpoints = vec!["a".to_string(), "b".to_string()];
    let rounds = vec![
        RoundResult::new(vec![Sample::Failed, Sample::Failed]),
        RoundResult::new(vec![Sample::Failed, Sample::Failed]),
    ];
    let ranked = aggregate_and_rank(&rounds, &endpoints);
    assert_eq!(ranked.failed_count(), 2);
    assert_eq!(ranked.iter().map(|s| s.endpoint.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);
}
