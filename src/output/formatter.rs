//! Core formatting traits and the plain text implementation
//!
//! The results table has one row per endpoint in ranked order. Latencies are
//! whole milliseconds; a failed endpoint shows blank AVG and P50 and `Error`
//! in the P90 column.

use crate::{
    error::{AppError, Result},
    models::{EndpointSelection, RankedList, SummaryResult},
    runner::RunOutcome,
    types::ProbeKind,
};
use std::fmt::Write as _;

/// Text shown in place of latencies for an endpoint that failed
pub const ERROR_CELL: &str = "Error";

/// Main trait for output formatting
pub trait OutputFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format the ranked results table
    fn format_results(&self, results: &RankedList) -> Result<String>;

    /// Format the explanation of what was measured
    fn format_about(&self, measured_rounds: usize, probe_kind: ProbeKind) -> Result<String>;

    /// Format the endpoint list with enabled markers
    fn format_endpoint_list(&self, selection: &EndpointSelection) -> Result<String>;

    fn format_error(&self, error: &str) -> Result<String>;

    fn format_warning(&self, warning: &str) -> Result<String>;

    fn format_success(&self, message: &str) -> Result<String>;

    /// Full report for a finished run
    fn format_report(&self, outcome: &RunOutcome) -> Result<String> {
        let mut output = String::new();
        output.push_str(&self.format_header("RESULTS")?);
        output.push('\n');
        output.push_str(&self.format_results(&outcome.results)?);
        output.push_str("\n\n");
        output.push_str(&self.format_about(outcome.measured_rounds(), outcome.probe_kind)?);
        Ok(output)
    }
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    pub enable_color: bool,
    /// Add run details (failures, fastest endpoint) below the table
    pub verbose_mode: bool,
    pub table_borders: bool,
    /// Endpoint column is truncated beyond this width
    pub max_width: usize,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            table_borders: true,
            max_width: 120,
        }
    }
}

/// Table formatting configuration
#[derive(Debug, Clone)]
pub struct TableFormat {
    pub columns: Vec<Column>,
    pub show_borders: bool,
    pub show_header: bool,
}

impl TableFormat {
    /// ENDPOINT, AVG, P50, P90
    pub fn results(options: &FormattingOptions) -> Self {
        Self {
            columns: vec![
                Column::new("ENDPOINT", Alignment::Left, 8, options.max_width),
                Column::new("AVG", Alignment::Right, 5, 12),
                Column::new("P50", Alignment::Right, 5, 12),
                Column::new("P90", Alignment::Right, 5, 12),
            ],
            show_borders: options.table_borders,
            show_header: true,
        }
    }
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub alignment: Alignment,
    pub min_width: usize,
    pub max_width: usize,
}

impl Column {
    pub fn new(header: &str, alignment: Alignment, min_width: usize, max_width: usize) -> Self {
        Self {
            header: header.to_string(),
            alignment,
            min_width,
            max_width,
        }
    }
}

/// Text alignment options
#[derive(Debug, Clone, Copy)]
pub enum Alignment {
    Left,
    Right,
}

pub type RowData = Vec<String>;

/// Whole milliseconds, as shown in the table
pub fn format_latency(ms: f64) -> String {
    format!("{:.0}", ms)
}

/// Table cells for one summary
pub fn result_row(summary: &SummaryResult) -> RowData {
    if summary.is_failed() {
        vec![
            summary.endpoint.clone(),
            String::new(),
            String::new(),
            ERROR_CELL.to_string(),
        ]
    } else {
        vec![
            summary.endpoint.clone(),
            format_latency(summary.average),
            format_latency(summary.p50),
            format_latency(summary.p90),
        ]
    }
}

/// About text; one line per bullet
pub fn about_lines(measured_rounds: usize, probe_kind: ProbeKind) -> Vec<String> {
    vec![
        format!(
            "Each RPC received {} {} requests; response times (latency) are in milliseconds.",
            measured_rounds,
            probe_kind.rpc_method()
        ),
        "AVG is the average latency of all requests sent to the RPC.".to_string(),
        "P50 is the 50th percentile (median) latency: 50% of the requests were faster.".to_string(),
        "P90 is the 90th percentile latency: 90% of the requests were faster.".to_string(),
        format!("An RPC that failed any request is marked {} and listed last.", ERROR_CELL),
    ]
}

pub(crate) fn fmt_err(e: std::fmt::Error) -> AppError {
    AppError::io(format!("Failed to format output: {}", e))
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormattingOptions {
        &self.options
    }

    /// Render a table; `style` receives (column, row, padded cell) for every data cell
    pub(crate) fn create_table<F>(&self, format: &TableFormat, rows: &[RowData], style: F) -> String
    where
        F: Fn(usize, usize, &str) -> String,
    {
        let widths = self.calculate_column_widths(format, rows);
        let mut output = String::new();

        if format.show_header && !format.columns.is_empty() {
            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&widths));
                output.push('\n');
            }

            let headers: Vec<String> = format.columns.iter().map(|c| c.header.clone()).collect();
            output.push_str(&self.create_row(&headers, &widths, format, |_, cell| cell.to_string()));
            output.push('\n');

            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&widths));
                output.push('\n');
            }
        }

        for (row_idx, row) in rows.iter().enumerate() {
            output.push_str(&self.create_row(row, &widths, format, |col, cell| style(col, row_idx, cell)));
            output.push('\n');
        }

        if format.show_borders {
            output.push_str(&self.create_horizontal_border(&widths));
        }

        output.trim_end_matches('\n').to_string()
    }

    fn calculate_column_widths(&self, format: &TableFormat, rows: &[RowData]) -> Vec<usize> {
        format
            .columns
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                let content = rows
                    .iter()
                    .filter_map(|r| r.get(idx))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0);
                content
                    .max(col.header.len())
                    .max(col.min_width)
                    .min(col.max_width)
            })
            .collect()
    }

    fn create_row<F>(&self, data: &[String], widths: &[usize], format: &TableFormat, style: F) -> String
    where
        F: Fn(usize, &str) -> String,
    {
        let mut row = String::new();

        if format.show_borders {
            row.push('|');
        }

        for (idx, (cell, &width)) in data.iter().zip(widths.iter()).enumerate() {
            let alignment = format
                .columns
                .get(idx)
                .map(|c| c.alignment)
                .unwrap_or(Alignment::Left);

            let padded = align_text(cell, width, alignment);

            if format.show_borders {
                row.push(' ');
            }
            row.push_str(&style(idx, &padded));
            if format.show_borders {
                row.push_str(" |");
            } else {
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }

    fn create_horizontal_border(&self, widths: &[usize]) -> String {
        let mut border = String::from("+");
        for &width in widths {
            border.push_str(&"-".repeat(width + 2));
            border.push('+');
        }
        border
    }

    /// Verbose run details shared by the text formatters
    pub(crate) fn details_lines(&self, results: &RankedList) -> Vec<String> {
        let mut lines = Vec::new();
        match results.fastest() {
            Some(fastest) => lines.push(format!(
                "Fastest: {} ({} ms average)",
                fastest.endpoint,
                format_latency(fastest.average)
            )),
            None => lines.push("Fastest: none, every endpoint failed".to_string()),
        }
        lines.push(format!(
            "Endpoints: {} ranked, {} failed",
            results.len() - results.failed_count(),
            results.failed_count()
        ));
        lines
    }
}

/// Pad or truncate to `width` characters
pub(crate) fn align_text(text: &str, width: usize, alignment: Alignment) -> String {
    let len = text.chars().count();
    if len > width {
        return truncate(text, width);
    }

    let padding = width - len;
    match alignment {
        Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
        Alignment::Right => format!("{}{}", " ".repeat(padding), text),
    }
}

fn truncate(text: &str, width: usize) -> String {
    if width <= 3 {
        return text.chars().take(width).collect();
    }
    let mut out: String = text.chars().take(width - 3).collect();
    out.push_str("...");
    out
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.len() + 4);

        writeln!(output, "{}", border).map_err(fmt_err)?;
        writeln!(output, "  {}  ", title).map_err(fmt_err)?;
        write!(output, "{}", border).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_results(&self, results: &RankedList) -> Result<String> {
        if results.is_empty() {
            return Ok("No endpoints were probed.".to_string());
        }

        let rows: Vec<RowData> = results.iter().map(result_row).collect();
        let mut output = self.create_table(&TableFormat::results(&self.options), &rows, |_, _, cell| {
            cell.to_string()
        });

        if self.options.verbose_mode {
            for line in self.details_lines(results) {
                write!(output, "\n{}", line).map_err(fmt_err)?;
            }
        }

        Ok(output)
    }

    fn format_about(&self, measured_rounds: usize, probe_kind: ProbeKind) -> Result<String> {
        let mut output = String::from("ABOUT");
        for line in about_lines(measured_rounds, probe_kind) {
            write!(output, "\n  - {}", line).map_err(fmt_err)?;
        }
        Ok(output)
    }

    fn format_endpoint_list(&self, selection: &EndpointSelection) -> Result<String> {
        let mut output = String::new();
        for rpc in selection.rpcs() {
            let mark = if rpc.enabled { "x" } else { " " };
            writeln!(output, "[{}] {}", mark, rpc.url).map_err(fmt_err)?;
        }
        Ok(output.trim_end().to_string())
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("ERROR: {}", error))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("WARNING: {}", warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("SUCCESS: {}", message))
    }
}
