//! Binário do serviço: configura o pipeline e serve `POST /parse`

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use textparse_core::NerPipeline;
use textparse_web::{config::ServerArgs, router, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    // Falha de carga do modelo ou dos padrões impede a inicialização
    let pipeline = NerPipeline::configured(&args.pipeline_config())
        .with_context(|| format!("falha ao configurar o pipeline (modelo '{}')", args.model))?;
    let state = Arc::new(AppState::new(pipeline));

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("falha ao escutar em {}", args.bind))?;
    info!("🚀 Servidor iniciado em http://{}", args.bind);

    axum::serve(listener, router(state))
        .await
        .context("servidor encerrado com erro")?;
    Ok(())
}
