//! Raw per-round probe data handed from the prober to the aggregator

use serde::{Deserialize, Serialize};

/// One latency measurement for one endpoint in one round
///
/// On the wire a sample is `{ "latency": <ms> }`, or `{}` when the probe
/// failed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "SampleRepr", into = "SampleRepr")]
pub enum Sample {
    /// Round-trip latency in milliseconds
    Latency(f64),
    /// The request errored, timed out or returned an RPC error
    Failed,
}

impl Sample {
    /// Latency in milliseconds, if the probe succeeded
    pub fn latency(&self) -> Option<f64> {
        match self {
            Sample::Latency(ms) => Some(*ms),
            Sample::Failed => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Sample::Failed)
    }
}

impl From<Option<f64>> for Sample {
    fn from(latency: Option<f64>) -> Self {
        latency.map_or(Sample::Failed, Sample::Latency)
    }
}

#[derive(Serialize, Deserialize)]
struct SampleRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    latency: Option<f64>,
}

impl From<SampleRepr> for Sample {
    fn from(repr: SampleRepr) -> Self {
        repr.latency.into()
    }
}

impl From<Sample> for SampleRepr {
    fn from(sample: Sample) -> Self {
        SampleRepr { latency: sample.latency() }
    }
}

/// All samples collected in one round, in endpoint order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundResult {
    samples: Vec<Sample>,
}

impl RoundResult {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Sample for the endpoint at `index`
    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn failure_count(&self) -> usize {
        self.samples.iter().filter(|s| s.is_failed()).count()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}

impl FromIterator<Sample> for RoundResult {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<Vec<Sample>> for RoundResult {
    fn from(samples: Vec<Sample>) -> Self {
        Self::new(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_wire_format() {
        assert_eq!(serde_json::to_string(&Sample::Latency(42.5)).unwrap(), r#"{"latency":42.5}"#);
        assert_eq!(serde_json::to_string(&Sample::Failed).unwrap(), "{}");
    }

    #[test]
    fn test_round_from_prober_json() {
        let round: RoundResult =
            serde_json::from_str(r#"[{"latency": 120}, {}, {"latency": 80.25}]"#).unwrap();
        assert_eq!(round.len(), 3);
        assert_eq!(round.get(0), Some(&Sample::Latency(120.0)));
        assert_eq!(round.get(1), Some(&Sample::Failed));
        assert_eq!(round.get(2).and_then(Sample::latency), Some(80.25));
        assert_eq!(round.get(3), None);
        assert_eq!(round.failure_count(), 1);
    }

    #[test]
    fn test_sample_from_option() {
        assert_eq!(Sample::from(Some(5.0)), Sample::Latency(5.0));
        assert!(Sample::from(None).is_failed());
    }
}
