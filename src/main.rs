use std::process::ExitCode;
use std::sync::Arc;

use tiered_exit_bot::bot::Bot;
use tiered_exit_bot::config::Config;
use tiered_exit_bot::logging::init_tracing;
use tracing::{debug, error, info};

/// Loads the configuration with a temporary stderr subscriber so that
/// warnings about malformed variables are not lost.
fn load_config() -> Result<Config, tiered_exit_bot::config::ConfigError> {
    let bootstrap = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::with_default(bootstrap, Config::load)
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Held until exit so buffered file output is flushed.
    let _log_guard = match init_tracing(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        pair = %config.trading.pair,
        total_capital = config.capital.total_capital,
        tiers = config.exit_policy.tiers.len(),
        exit_policy_enabled = config.exit_policy.enabled,
        dry_run = config.dry_run_enabled,
        testnet = config.trading.testnet_enabled,
        "Configuration loaded"
    );
    match serde_json::to_string(&config) {
        Ok(json) => debug!(config = %json, "Effective configuration"),
        Err(e) => debug!(error = %e, "Failed to serialize configuration"),
    }

    let bot = match Bot::new(config) {
        Ok(bot) => Arc::new(bot),
        Err(e) => {
            error!(error = %e, "Failed to create bot");
            return ExitCode::FAILURE;
        }
    };

    let runner = Arc::clone(&bot);
    let handle = tokio::spawn(async move { runner.start().await });

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");

    if let Err(e) = bot.stop().await {
        error!(error = %e, "Failed to stop bot");
    }

    match handle.await {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(e)) => {
            error!(error = %e, "Bot error");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "Bot task panicked");
            ExitCode::FAILURE
        }
    }
}
