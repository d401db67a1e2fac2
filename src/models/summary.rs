//! Aggregated per-endpoint results and the ranked list built from them

use serde::{Deserialize, Deserializer, Serialize};

/// Summary statistics for one endpoint
///
/// `average`, `p50` and `p90` are NaN when `error` is set. serde_json writes
/// NaN as `null`, and `null` reads back as NaN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResult {
    pub endpoint: String,
    #[serde(deserialize_with = "nan_from_null")]
    pub average: f64,
    #[serde(deserialize_with = "nan_from_null")]
    pub p50: f64,
    #[serde(deserialize_with = "nan_from_null")]
    pub p90: f64,
    pub error: bool,
}

impl SummaryResult {
    /// Summary for an endpoint with usable samples
    pub fn success(endpoint: impl Into<String>, average: f64, p50: f64, p90: f64) -> Self {
        Self {
            endpoint: endpoint.into(),
            average,
            p50,
            p90,
            error: false,
        }
    }

    /// Summary for an endpoint that failed or produced no samples
    pub fn failed(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            average: f64::NAN,
            p50: f64::NAN,
            p90: f64::NAN,
            error: true,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error
    }
}

impl PartialEq for SummaryResult {
    // NaN fields of failed summaries compare equal to each other.
    fn eq(&self, other: &Self) -> bool {
        fn same(a: f64, b: f64) -> bool {
            (a.is_nan() && b.is_nan()) || a == b
        }
        self.endpoint == other.endpoint
            && self.error == other.error
            && same(self.average, other.average)
            && same(self.p50, other.p50)
            && same(self.p90, other.p90)
    }
}

fn nan_from_null<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Summaries sorted fastest-first with failed endpoints last
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedList {
    entries: Vec<SummaryResult>,
}

impl RankedList {
    /// Wrap entries that are already in ranked order
    pub(crate) fn from_ranked(entries: Vec<SummaryResult>) -> Self {
        Self { entries }
    }

    /// Fastest endpoint that did not fail
    pub fn fastest(&self) -> Option<&SummaryResult> {
        self.entries.first().filter(|s| !s.error)
    }

    pub fn successful(&self) -> impl Iterator<Item = &SummaryResult> {
        self.entries.iter().filter(|s| !s.error)
    }

    pub fn failed_count(&self) -> usize {
        self.entries.iter().filter(|s| s.error).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SummaryResult> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[SummaryResult] {
        &self.entries
    }

    pub fn into_vec(self) -> Vec<SummaryResult> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a RankedList {
    type Item = &'a SummaryResult;
    type IntoIter = std::slice::Iter<'a, SummaryResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_summary_fields() {
        let s = SummaryResult::failed("https://a");
        assert!(s.error);
        assert!(s.average.is_nan() && s.p50.is_nan() && s.p90.is_nan());
    }

    #[test]
    fn test_output_contract_json() {
        let ok = SummaryResult::success("https://a", 12.5, 12.0, 14.0);
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"endpoint": "https://a", "average": 12.5, "p50": 12.0, "p90": 14.0, "error": false})
        );

        let bad = serde_json::to_string(&SummaryResult::failed("https://b")).unwrap();
        assert_eq!(bad, r#"{"endpoint":"https://b","average":null,"p50":null,"p90":null,"error":true}"#);

        let back: SummaryResult = serde_json::from_str(&bad).unwrap();
        assert_eq!(back, SummaryResult::failed("https://b"));
    }

    #[test]
    fn test_ranked_list_accessors() {
        let list = RankedList::from_ranked(vec![
            SummaryResult::success("fast", 10.0, 10.0, 10.0),
            SummaryResult::failed("down"),
        ]);
        assert_eq!(list.len(), 2);
        assert_eq!(list.fastest().map(|s| s.endpoint.as_str()), Some("fast"));
        assert_eq!(list.failed_count(), 1);
        assert_eq!(list.successful().count(), 1);

        let all_failed = RankedList::from_ranked(vec![SummaryResult::failed("down")]);
        assert!(all_failed.fastest().is_none());
    }
}
