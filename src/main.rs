//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use pdv_backend::{
    config::{AppState, Config},
    routes::app_router,
    services::migration_service::open_legacy_store,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = Config::from_env()?;
    let app_state = AppState::new(config).await?;

    if let (Some(email), Some(password)) = (
        app_state.config.master_email.as_deref(),
        app_state.config.master_password.as_deref(),
    ) {
        app_state.auth_service.ensure_master(email, password).await?;
    }

    // Migração do banco compartilhado antigo. Erros aqui não derrubam o servidor.
    if let Some(path) = app_state.config.legacy_db_path.as_deref() {
        match open_legacy_store(path).await {
            Ok(Some(legacy)) => {
                match app_state.migration_service.run(&legacy).await {
                    Ok(reports) => {
                        let inserted: u64 = reports.iter().map(|r| r.inserted()).sum();
                        tracing::info!(companies = reports.len(), inserted, "✅ Migração de dados antigos concluída");
                    }
                    Err(e) => tracing::error!("🔥 Migração de dados antigos falhou: {}", e),
                }
                legacy.close().await;
            }
            Ok(None) => {}
            Err(e) => tracing::error!("🔥 Falha ao abrir o banco antigo: {}", e),
        }
    }

    let registry = app_state.registry.clone();
    let db_pool = app_state.db_pool.clone();
    let listener = TcpListener::bind(&app_state.config.bind_addr).await?;
    let app = app_router(app_state);

    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    registry.close_all().await;
    db_pool.close().await;
    tracing::info!("👋 Servidor encerrado");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Falha ao escutar o sinal de desligamento: {}", e);
    }
}
