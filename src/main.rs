//! admin-monitor binary

use admin_monitor::server;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Metrics aggregation and alerting service
#[derive(Debug, Parser)]
#[command(name = "admin-monitor", version, about)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(
        short,
        long,
        env = "ADMIN_MONITOR_CONFIG",
        default_value = "config/monitor.yaml"
    )]
    config: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "ADMIN_MONITOR_LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    match server::builder::run_server(&cli.config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
