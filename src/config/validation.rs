//! Configuration validation utilities and rules
//!
//! `Config::validate` rejects configurations that cannot run. The checks here
//! only produce warnings about setups that run but may mislead.

use crate::{error::Result, models::Config};
use colored::*;
use std::collections::HashSet;

/// Configuration validator with advisory rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Run hard validation, then collect warnings
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Vec::new();
        let base = config.base_endpoints();

        warnings.extend(Self::validate_endpoint_urls(base.iter().chain(&config.custom_endpoints)));
        warnings.extend(Self::validate_duplicates(&base, &config.custom_endpoints));
        warnings.extend(Self::validate_exclusions(config));
        warnings.extend(Self::validate_run_settings(config));

        Ok(warnings)
    }

    /// Per-URL checks: plain HTTP, private hosts, ports, query strings
    fn validate_endpoint_urls<'a>(urls: impl Iterator<Item = &'a String>) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        for url in urls {
            let Ok(parsed) = url::Url::parse(url) else {
                continue;
            };

            if parsed.scheme() == "http" {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("Endpoint '{}' uses HTTP instead of HTTPS", url),
                ));
            }

            if let Some(port) = parsed.port() {
                let standard = matches!((parsed.scheme(), port), ("http", 80) | ("https", 443));
                if !standard {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Info,
                        format!("Endpoint '{}' uses non-standard port {}", url, port),
                    ));
                }
            }

            let local = match parsed.host() {
                Some(url::Host::Ipv4(ip)) => ip.is_private() || ip.is_loopback(),
                Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
                Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
                None => false,
            };
            if local {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    format!("Endpoint '{}' targets a private or local network", url),
                ));
            }

            if parsed.query().is_some() {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    format!("Endpoint '{}' includes query parameters", url),
                ));
            }
        }

        warnings
    }

    /// Custom endpoints already present in the base list are ignored
    fn validate_duplicates(base: &[String], custom: &[String]) -> Vec<ValidationWarning> {
        let mut seen: HashSet<&str> = base.iter().map(String::as_str).collect();

        custom
            .iter()
            .filter(|url| !seen.insert(url.as_str()))
            .map(|url| {
                ValidationWarning::new(
                    ValidationLevel::Info,
                    format!("Endpoint '{}' is listed more than once and will be probed once", url),
                )
            })
            .collect()
    }

    fn validate_exclusions(config: &Config) -> Vec<ValidationWarning> {
        let selection = config.selection();

        config
            .excluded_endpoints
            .iter()
            .filter(|url| !selection.contains(url))
            .map(|url| {
                ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("Excluded endpoint '{}' is not in the endpoint list", url),
                )
            })
            .collect()
    }

    /// Round count and timeout checks
    fn validate_run_settings(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        let measured = config.measured_rounds();
        if measured < 3 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Only {} measured round(s) per endpoint; percentiles will not be reliable (recommended: >= 3)",
                    measured
                ),
            ));
        }

        if config.warmup_rounds == 0 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                "No warm-up round; connection setup is included in the first measurement".to_string(),
            ));
        }

        if config.timeout_seconds < 2 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Timeout of {}s may mark slow but healthy endpoints as failed",
                    config.timeout_seconds
                ),
            ));
        } else if config.timeout_seconds > 60 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Long timeout of {}s will slow down each failing round", config.timeout_seconds),
            ));
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        let tag = format!("[{}]", self.level.as_str());
        if !use_color {
            return format!("{} {}", tag, self.message);
        }

        let tag = match self.level {
            ValidationLevel::Info => tag.blue(),
            ValidationLevel::Warning => tag.yellow().bold(),
        };
        format!("{} {}", tag, self.message)
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
