use anyhow::{Context, Result};
use clinic_admin::auth::OperatorAuth;
use clinic_admin::{build_router, AdminConfig, AppState};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Falha ao aguardar sinal de encerramento: {}", e);
    }
    info!("Encerrando servidor...");
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AdminConfig::from_env().context("Configuração inválida")?;
    init_tracing(config.log_json);

    info!(
        "Iniciando {} v{}",
        clinic_admin::built_info::PKG_NAME,
        clinic_admin::built_info::PKG_VERSION
    );

    let store = config.build_store().await?;
    let mut state = AppState::new(store);
    match &config.jwt_secret {
        Some(secret) => state = state.with_auth(OperatorAuth::new(secret)),
        None => warn!("MINDCARE_JWT_SECRET ausente: API sem autenticação de operador"),
    }

    let app = build_router(state, config.max_concurrent_requests);

    info!("Servidor escutando em {}", config.bind_addr);
    axum::Server::bind(&config.bind_addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Falha ao executar servidor HTTP")?;

    Ok(())
}
