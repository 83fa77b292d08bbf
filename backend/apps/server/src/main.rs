//! Word-of-wisdom server entry point
//!
//! Startup errors use `anyhow`; everything below the composition root reports
//! through `kernel::error::AppError`.

mod config;

use clap::Parser;
use config::CliArgs;
use kernel::AppError;
use quote::StaticQuoteRepository;
use tokio::signal;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use wisdom::{HandlerRegistry, PowServer, ServerConfig, ShutdownReport};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    init_tracing(args.log_json);

    let quotes_file = args.quotes_file.clone();
    let config = ServerConfig::try_from(args)?;
    tracing::debug!(?config, "Server configuration loaded");

    let repo = match quotes_file {
        Some(path) => StaticQuoteRepository::from_file(&path)
            .await
            .map_err(AppError::from)?,
        None => StaticQuoteRepository::builtin(),
    };
    if repo.is_empty() {
        tracing::warn!("Quote set is empty; every solved request will get an error line");
    }

    let server = PowServer::new(config, HandlerRegistry::with_default_routes(), repo)
        .start()
        .await
        .map_err(AppError::from)?;

    tokio::select! {
        _ = shutdown_signal() => {}
        _ = server.cancelled() => {}
    }

    match server.shutdown().await {
        ShutdownReport::Drained => tracing::info!("Server stopped"),
        ShutdownReport::TimedOut { abandoned } => {
            tracing::warn!(abandoned, "Server stopped with connections still in flight")
        }
    }
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "wisdom_server=info,wisdom=info,pow=info,quote=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}
