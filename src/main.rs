//! Hookable demo
//!
//! Loads configuration, initialises logging and runs the demo scenarios.

use clap::{Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt};

use hookable::{HookError, HookableConfig, LoggingConfig};

mod demo;

/// Runs hookable scenarios against a configuration file
#[derive(Debug, Parser)]
#[command(name = "hookable-demo", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Scenario to run
    #[arg(value_enum, default_value = "all")]
    scenario: Scenario,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// Order to rows with parallel, per-item and aggregate hooks
    Rows,
    /// Request pipeline through the middleware invoker
    Server,
    /// Both scenarios
    All,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = run(cli.scenario, config).await {
        tracing::error!("Demo error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration(path: &str) -> Result<HookableConfig, HookError> {
    let path = std::env::var("HOOKABLE_CONFIG").unwrap_or_else(|_| path.to_string());
    HookableConfig::load(&path)
}

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(scenario: Scenario, config: HookableConfig) -> Result<(), HookError> {
    tracing::info!("Starting hookable demo v{}", env!("CARGO_PKG_VERSION"));

    if matches!(scenario, Scenario::Rows | Scenario::All) {
        demo::rows::run(&config).await?;
    }
    if matches!(scenario, Scenario::Server | Scenario::All) {
        demo::server::run(&config).await?;
    }
    Ok(())
}
