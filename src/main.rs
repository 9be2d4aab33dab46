use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "payroll-engine", version, about = "Monthly payroll calculation service")]
struct Cli {
    /// Directory containing `rates/<year>.yaml`.
    #[arg(long, env = "PAYROLL_CONFIG_DIR", default_value = "./config")]
    config_dir: PathBuf,
    /// Address to listen on.
    #[arg(long, env = "PAYROLL_BIND_ADDR", default_value = "127.0.0.1:3000")]
    bind: SocketAddr,
    /// Validate the rate tables and exit.
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = ConfigLoader::load(&cli.config_dir)
        .with_context(|| format!("failed to load rate tables from {}", cli.config_dir.display()))?;

    if cli.check_config {
        info!(tax_years = ?config.tax_years(), "Rate tables are valid");
        return Ok(());
    }

    let router = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;

    info!(addr = %cli.bind, "Payroll engine listening");
    axum::serve(listener, router).await.context("server error")?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
