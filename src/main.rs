mod aggregate;
mod clean;
mod cli;
mod config;
mod duration;
mod error;
mod export;
mod ingest;
mod pipeline;
mod render;
mod schema;
mod server;
mod types;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Inicializa o sistema de logging (tracing), respeitando RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = cli::Cli::parse();

    // Carrega a configuração da aplicação (Arc para compartilhamento com os handlers)
    let config: Arc<config::Config> = Arc::new(config::Config::load()?);
    info!(
        "Configuração carregada: alarme {}, mínimo {} min, janela {} min",
        config.target_alarm_id, config.min_duration_minutes, config.window_minutes
    );

    match cli.command.unwrap_or(cli::Command::Serve) {
        cli::Command::Serve => server::run_server(config).await,
        cli::Command::Report {
            input,
            output,
            json,
        } => {
            // Leitura e exportação são bloqueantes
            tokio::task::spawn_blocking(move || cli::run_report(&config, input, output, json)).await?
        }
    }
}
