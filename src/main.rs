//! rlr - probe Sui JSON-RPC endpoints and rank them by latency

use clap::Parser;
use rpc_latency_ranker::{
    cli::Cli,
    config::{display_config_summary, load_config, validate_config, EnvManager, ValidationLevel},
    error::{AppError, Result},
    log_debug, log_info, log_warn,
    logging::LoggerFactory,
    models::Config,
    output::OutputFormatterFactory,
    probe::SuiRpcProber,
    runner::{RoundProgress, RoundRunner},
    long_version, PKG_NAME,
};
use std::io::{IsTerminal, Write};
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(99);
    }));

    let cli = Cli::parse();
    let use_color = cli.use_colors(true);

    if let Err(e) = run_application(cli).await {
        eprintln!("{}", e.format_for_console(use_color));
        if let Some(hint) = e.suggestion() {
            eprintln!("  {}", hint);
        }
        process::exit(e.exit_code());
    }
}

async fn run_application(cli: Cli) -> Result<()> {
    cli.validate().map_err(AppError::validation)?;

    if cli.debug {
        eprintln!("{} {}", PKG_NAME, long_version());
    }

    if cli.env_help {
        println!("{}", EnvManager::display_env_help());
        return Ok(());
    }

    if let Some(path) = &cli.init_env {
        if path.exists() {
            return Err(AppError::io(format!("{} already exists; not overwriting", path.display())));
        }
        EnvManager::save_example_env_file(path)?;
        let formatter = OutputFormatterFactory::create_formatter(cli.use_colors(true), false);
        println!("{}", formatter.format_success(&format!("Wrote example configuration to {}", path.display()))?);
        return Ok(());
    }

    let probe_mode = cli.is_probe_mode();
    let config = load_config(cli)?;
    let formatter = OutputFormatterFactory::for_config(&config);

    if config.debug {
        eprintln!("{}\n", display_config_summary(&config));
    }

    let selection = config.selection();
    if !probe_mode {
        println!("{}", formatter.format_endpoint_list(&selection)?);
        return Ok(());
    }

    if !config.json_output {
        for warning in validate_config(&config)? {
            if config.verbose || config.debug || warning.level == ValidationLevel::Warning {
                eprintln!("{}", warning.format(config.enable_color));
            }
        }
    }

    let loggers = LoggerFactory::new(config.clone());
    let logger = loggers.create_logger("MAIN").await;
    log_debug!(logger, "session {}", loggers.session_id());

    let prober = SuiRpcProber::from_config(&config)?.with_logger(loggers.create_probe_logger().await);
    let runner = RoundRunner::from_config(Arc::new(prober), &config).with_logger(loggers.create_run_logger().await);

    let endpoints = selection.enabled_urls();
    log_info!(
        logger,
        "Testing {} endpoints with {} ({} rounds)",
        endpoints.len(),
        config.probe_kind.rpc_method(),
        config.rounds
    );

    let show_progress = !config.json_output && std::io::stderr().is_terminal();
    let outcome = runner
        .run(&endpoints, |progress| {
            if show_progress {
                draw_progress(&progress, &config);
            }
        })
        .await;
    if show_progress {
        eprintln!();
    }

    if outcome.results.fastest().is_none() {
        log_warn!(logger, "Every endpoint failed; check connectivity or raise --timeout");
    }

    println!("{}", formatter.format_report(&outcome)?);
    Ok(())
}

/// Redraw the progress bar in place on stderr
fn draw_progress(progress: &RoundProgress, config: &Config) {
    const WIDTH: usize = 30;
    let filled = ((progress.percent / 100.0) * WIDTH as f64).round() as usize;
    let bar = format!("{}{}", "#".repeat(filled.min(WIDTH)), ".".repeat(WIDTH - filled.min(WIDTH)));

    let mut stderr = std::io::stderr();
    let _ = write!(
        stderr,
        "\r[{}] {:>3.0}%  round {}/{}",
        bar, progress.percent, progress.completed, config.rounds
    );
    let _ = stderr.flush();
}
