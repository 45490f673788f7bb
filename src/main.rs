// Arca - Disaster-Recovery Replicator for Digital Preservation Archives
// Copyright (c) 2025 Arca Contributors
// Licensed under the MIT License

use arca::cli::{Cli, Commands};
use arca::config::LoggingConfig;
use arca::logging::init_logging;
use clap::Parser;
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Console-only logging for the CLI; file logging is a deployment concern
    let log_level = cli.log_level.as_deref().unwrap_or("info");
    let logging_config = LoggingConfig::default();
    let _guard = match init_logging(log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Arca - preservation archive replicator"
    );

    // Shutdown channel checked between batches
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm =
                signal(SignalKind::terminate()).expect("Failed to create SIGTERM handler");

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received SIGINT, finishing current batch before exit");
                    let _ = shutdown_tx_clone.send(true);
                }
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, finishing current batch before exit");
                    let _ = shutdown_tx_clone.send(true);
                }
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            } else {
                tracing::info!("Received SIGINT, finishing current batch before exit");
                let _ = shutdown_tx_clone.send(true);
            }
        }
    });

    let exit_code = match execute_command(&cli, shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, shutdown_signal: watch::Receiver<bool>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Run(args) => args.execute(&cli.config, shutdown_signal).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
