use std::sync::Arc;

use clap::Parser;
use tracing::info;

use docchat_server::background;
use docchat_server::cli::{self, Cli, Command};
use docchat_server::{build_router, AppState};

fn load_config() -> docchat_core::Config {
    docchat_core::config::load_dotenv();
    docchat_core::Config::from_env()
}

async fn serve(mut config: docchat_core::Config, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.log_summary();

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config));
    background::spawn_session_sweeper(state.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    info!("API docs at http://{}/docs", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = load_config();

    match cli.command {
        Command::Serve { host, port } => serve(config, host, port).await,
        Command::Ask(args) => {
            let report = cli::run_ask(&config, args).await?;
            cli::print_report(&report)
        }
    }
}
