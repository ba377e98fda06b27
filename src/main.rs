//src/main.rs

use anyhow::Context;
use tokio::net::TcpListener;

use wms_backend::{
    app::build_app,
    common::logging,
    config::{AppConfig, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = AppConfig::from_env().context("Falha ao carregar a configuração")?;
    logging::init(&config);

    tracing::info!(
        environment = %config.environment,
        backend = ?config.storage_backend,
        "Iniciando o serviço de estoque"
    );

    let addr = config.bind_addr();
    let app_state = AppState::new(config)
        .await
        .context("Falha ao inicializar o estado da aplicação")?;

    let app = build_app(app_state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Falha ao iniciar o listener TCP em {addr}"))?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    tracing::info!("📚 Swagger UI em http://{}/swagger-ui", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Erro no servidor Axum")?;

    tracing::info!("Servidor encerrado");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Falha ao escutar o sinal de encerramento: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Sinal de encerramento recebido");
}
