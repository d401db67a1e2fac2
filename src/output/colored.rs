//! Colored formatter implementation with terminal color support

use super::formatter::{
    about_lines, fmt_err, result_row, FormattingOptions, OutputFormatter, PlainFormatter, RowData, TableFormat,
};
use crate::{
    error::Result,
    models::{EndpointSelection, RankedList},
    types::ProbeKind,
};
use colored::*;
use std::fmt::Write as _;

/// Latency band used for color coding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceLevel {
    Fast,     // < 100ms
    Moderate, // 100-300ms
    Slow,     // 300-1000ms
    VerySlow, // >= 1000ms
}

impl PerformanceLevel {
    pub fn from_latency(ms: f64) -> Self {
        if ms < 100.0 {
            Self::Fast
        } else if ms < 300.0 {
            Self::Moderate
        } else if ms < 1000.0 {
            Self::Slow
        } else {
            Self::VerySlow
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Fast => Color::Green,
            Self::Moderate => Color::Cyan,
            Self::Slow => Color::Yellow,
            Self::VerySlow => Color::Red,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Fast => "Fast",
            Self::Moderate => "Moderate",
            Self::Slow => "Slow",
            Self::VerySlow => "Very Slow",
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub muted: Color,
    pub border: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            muted: Color::BrightBlack,
            border: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        let plain_formatter = PlainFormatter::new(options.clone());
        Self {
            plain_formatter,
            options,
            color_scheme,
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    /// Bold and colored, or plain when colors are disabled
    fn emphasize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color).bold()
        } else {
            text.normal()
        }
    }

    fn dimmed(&self, text: &str) -> ColoredString {
        self.colorize(text, self.color_scheme.muted)
    }

    /// Paint one padded table cell of the results table
    fn paint_cell(&self, results: &RankedList, col: usize, row: usize, cell: &str) -> String {
        let Some(summary) = results.as_slice().get(row) else {
            return cell.to_string();
        };

        if summary.is_failed() {
            return match col {
                0 => self.dimmed(cell).to_string(),
                3 => self.emphasize(cell, self.color_scheme.error).to_string(),
                _ => cell.to_string(),
            };
        }

        let value = match col {
            0 if row == 0 => return self.bold(cell).to_string(),
            0 => return cell.to_string(),
            1 => summary.average,
            2 => summary.p50,
            _ => summary.p90,
        };
        self.colorize(cell, PerformanceLevel::from_latency(value).color()).to_string()
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let border = "=".repeat(title.len() + 4);
        let mut output = String::new();

        writeln!(output, "{}", self.colorize(&border, self.color_scheme.header)).map_err(fmt_err)?;
        writeln!(output, "  {}  ", self.emphasize(title, self.color_scheme.header)).map_err(fmt_err)?;
        write!(output, "{}", self.colorize(&border, self.color_scheme.header)).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_results(&self, results: &RankedList) -> Result<String> {
        if results.is_empty() {
            return Ok(self.dimmed("No endpoints were probed.").to_string());
        }

        let rows: Vec<RowData> = results.iter().map(result_row).collect();
        let format = TableFormat::results(&self.options);
        let mut output = self
            .plain_formatter
            .create_table(&format, &rows, |col, row, cell| self.paint_cell(results, col, row, cell));

        if self.options.verbose_mode {
            for line in self.plain_formatter.details_lines(results) {
                write!(output, "\n{}", self.dimmed(&line)).map_err(fmt_err)?;
            }
        }

        Ok(output)
    }

    fn format_about(&self, measured_rounds: usize, probe_kind: ProbeKind) -> Result<String> {
        let mut output = self.bold("ABOUT").to_string();
        for line in about_lines(measured_rounds, probe_kind) {
            write!(output, "\n  {} {}", self.dimmed("▸"), line).map_err(fmt_err)?;
        }
        Ok(output)
    }

    fn format_endpoint_list(&self, selection: &EndpointSelection) -> Result<String> {
        let mut output = String::new();
        for rpc in selection.rpcs() {
            if rpc.enabled {
                writeln!(output, "{} {}", self.colorize("[x]", self.color_scheme.success), rpc.url)
                    .map_err(fmt_err)?;
            } else {
                writeln!(output, "{} {}", self.dimmed("[ ]"), self.dimmed(&rpc.url)).map_err(fmt_err)?;
            }
        }
        Ok(output.trim_end().to_string())
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("{} {}", self.emphasize("ERROR:", self.color_scheme.error), error))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("{} {}", self.emphasize("WARNING:", self.color_scheme.warning), warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("{} {}", self.emphasize("SUCCESS:", self.color_scheme.success), message))
    }
}
