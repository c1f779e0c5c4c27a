//! Process entry point: loads configuration, wires every pipeline behind
//! the HTTP surface, and serves until shutdown (§6 "Exit behaviour").

use std::process::ExitCode;

use intellihire_core::config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive("intellihire_core=info".parse().unwrap()))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("failed to load configuration: {:#}", err);
            return ExitCode::FAILURE;
        }
    };

    let (router, _db) = match intellihire_core::build_app(&config) {
        Ok(built) => built,
        Err(err) => {
            tracing::error!("failed to build application: {:#}", err);
            return ExitCode::FAILURE;
        }
    };

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind {}: {:#}", config.bind_addr, err);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("listening on {}", config.bind_addr);

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutdown signal received");
    };

    if let Err(err) = axum::serve(listener, router).with_graceful_shutdown(shutdown).await {
        tracing::error!("server error: {:#}", err);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
