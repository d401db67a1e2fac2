//! Configuration parsing from CLI arguments and environment variables

use crate::{cli::Cli, config::env::EnvManager, error::Result, models::Config};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Load .env, merge the process environment, apply CLI overrides, validate
    pub fn parse(&self) -> Result<Config> {
        EnvManager::load_env_file(self.cli.debug)?;
        self.parse_with_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`parse`](Self::parse) with environment values taken from `lookup`
    pub fn parse_with_lookup<F>(&self, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        config.merge_from_lookup(lookup)?;
        self.apply_cli_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        let cli = &self.cli;

        if let Some(network) = cli.network {
            config.network = network;
        }

        if !cli.endpoints.is_empty() {
            config.endpoints = cli.endpoints.clone();
        }

        config.custom_endpoints.extend(cli.add_endpoints.iter().cloned());
        config.excluded_endpoints.extend(cli.exclude.iter().cloned());

        if let Some(rounds) = cli.rounds {
            config.rounds = rounds;
        }

        if let Some(warmup) = cli.warmup {
            config.warmup_rounds = warmup;
        }

        if let Some(probe) = cli.probe {
            config.probe_kind = probe;
        }

        if let Some(timeout) = cli.timeout {
            config.timeout_seconds = timeout;
        }

        if let Some(concurrency) = cli.concurrency {
            config.max_concurrency = concurrency as usize;
        }

        config.enable_color = cli.use_colors(config.enable_color);
        config.json_output = cli.json;
        config.verbose = cli.verbose;
        config.debug = cli.debug;

        if config.debug {
            eprintln!("Applied CLI overrides to configuration");
            eprintln!(
                "Final config: rounds={}, warmup={}, probe={}, timeout={}s, concurrency={}",
                config.rounds,
                config.warmup_rounds,
                config.probe_kind,
                config.timeout_seconds,
                config.max_concurrency
            );
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let selection = config.selection();
    let enabled = selection.enabled_urls();

    let mut summary = Vec::new();
    summary.push(format!("Network: {}", config.network));
    summary.push(format!("Endpoints: {} ({} enabled)", selection.len(), enabled.len()));
    if !config.custom_endpoints.is_empty() {
        summary.push(format!("Custom Endpoints: {}", config.custom_endpoints.join(", ")));
    }
    if !config.excluded_endpoints.is_empty() {
        summary.push(format!("Excluded: {}", config.excluded_endpoints.join(", ")));
    }
    summary.push(format!("Probe: {} ({})", config.probe_kind, config.probe_kind.rpc_method()));
    summary.push(format!(
        "Rounds: {} ({} warm-up, {} measured)",
        config.rounds,
        config.warmup_rounds,
        config.measured_rounds()
    ));
    summary.push(format!("Timeout: {}s", config.timeout_seconds));
    summary.push(format!("Concurrency: {}", config.max_concurrency));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
