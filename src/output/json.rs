//! JSON output
//!
//! The report is the bare result array `[{endpoint, average, p50, p90, error}]`
//! so it can be piped straight into other tools. Latencies of failed
//! endpoints are NaN and serialize as `null`.

use super::formatter::OutputFormatter;
use crate::{
    error::Result,
    models::{EndpointSelection, RankedList},
    runner::RunOutcome,
    types::ProbeKind,
};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(text)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_header(&self, _title: &str) -> Result<String> {
        Ok(String::new())
    }

    fn format_results(&self, results: &RankedList) -> Result<String> {
        self.render(results)
    }

    fn format_about(&self, measured_rounds: usize, probe_kind: ProbeKind) -> Result<String> {
        self.render(&json!({
            "measuredRounds": measured_rounds,
            "probe": probe_kind,
            "method": probe_kind.rpc_method(),
        }))
    }

    fn format_endpoint_list(&self, selection: &EndpointSelection) -> Result<String> {
        self.render(selection.rpcs())
    }

    fn format_error(&self, error: &str) -> Result<String> {
        self.render(&json!({ "error": error }))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        self.render(&json!({ "warning": warning }))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        self.render(&json!({ "message": message }))
    }

    fn format_report(&self, outcome: &RunOutcome) -> Result<String> {
        self.format_results(&outcome.results)
    }
}
