//! Word-of-wisdom load generator entry point

mod config;

use clap::Parser;
use config::CliArgs;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use wisdom::ClientConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    init_tracing(args.log_json);

    let config = ClientConfig::try_from(args)?;
    tracing::info!(
        server_addr = %config.server_addr,
        rps = config.rps,
        total_requests = config.total_requests,
        handler_id = %config.handler_id,
        "Client configuration loaded"
    );

    let summary = wisdom::run_load(&config).await;
    if summary.failed > 0 {
        anyhow::bail!("{} of {} requests failed", summary.failed, summary.total());
    }
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "wisdom_client=info,wisdom=info,pow=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
