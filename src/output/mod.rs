//! Output formatting and display system
//!
//! Plain and colored formatters render the ranked table; the JSON formatter
//! emits the machine-readable result array.

mod colored;
mod formatter;
mod json;

pub use colored::{ColorScheme, ColoredFormatter, PerformanceLevel};
pub use formatter::{
    about_lines, format_latency, result_row, Alignment, Column, FormattingOptions, OutputFormatter, PlainFormatter,
    RowData, TableFormat, ERROR_CELL,
};
pub use json::JsonFormatter;

use crate::models::Config;

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a text formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            ..FormattingOptions::default()
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Formatter selected by the configuration
    pub fn for_config(config: &Config) -> Box<dyn OutputFormatter> {
        if config.json_output {
            Box::new(JsonFormatter::new(true))
        } else {
            Self::create_formatter(config.enable_color, config.verbose)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SummaryResult;
    use crate::stats::rank;

    #[test]
    fn test_factory_selects_json() {
        let config = Config {
            json_output: true,
            ..Config::default()
        };
        let formatter = OutputFormatterFactory::for_config(&config);
        let out = formatter
            .format_results(&rank(vec![SummaryResult::success("a", 1.0, 1.0, 1.0)]))
            .unwrap();
        assert!(out.trim_start().starts_with('['));
    }

    #[test]
    fn test_factory_plain_without_color() {
        let formatter = OutputFormatterFactory::create_formatter(false, false);
        assert_eq!(formatter.format_warning("careful").unwrap(), "WARNING: careful");
    }
}
