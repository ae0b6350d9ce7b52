//! Configuração do serviço administrativo
//!
//! Valores padrão sobrescritos por variáveis de ambiente.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clinic_store::{ClinicStore, DbConfig, PostgrestConfig, PostgrestStore, SqliteStore};
use tracing::{info, warn};

/// Backend do store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Banco SQLite local
    Sqlite,
    /// Projeto remoto (PostgREST + GoTrue)
    Supabase,
}

impl std::str::FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StoreBackend::Sqlite),
            "supabase" | "postgrest" => Ok(StoreBackend::Supabase),
            other => bail!("Backend de store desconhecido: {}", other),
        }
    }
}

/// Configuração completa do serviço
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub bind_addr: SocketAddr,
    pub backend: StoreBackend,
    pub db: DbConfig,
    pub postgrest: PostgrestConfig,
    /// Segredo HS256 dos tokens de operador; sem ele a API fica aberta
    pub jwt_secret: Option<String>,
    pub max_concurrent_requests: usize,
    pub log_json: bool,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            backend: StoreBackend::Sqlite,
            db: DbConfig::default(),
            postgrest: PostgrestConfig::default(),
            jwt_secret: None,
            max_concurrent_requests: 64,
            log_json: false,
        }
    }
}

impl AdminConfig {
    /// Lê a configuração das variáveis de ambiente do processo
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Lê a configuração de uma fonte arbitrária de variáveis
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(addr) = var("MINDCARE_BIND") {
            config.bind_addr = addr
                .parse()
                .with_context(|| format!("MINDCARE_BIND inválido: {}", addr))?;
        }
        if let Some(backend) = var("MINDCARE_STORE") {
            config.backend = backend.parse()?;
        }
        if let Some(path) = var("MINDCARE_DB_PATH") {
            config.db.db_path = path;
        }
        if let Some(max) = var("MINDCARE_DB_MAX_CONNECTIONS") {
            config.db.max_connections = max
                .parse()
                .with_context(|| format!("MINDCARE_DB_MAX_CONNECTIONS inválido: {}", max))?;
        }
        if let Some(url) = var("SUPABASE_URL") {
            config.postgrest.base_url = url;
        }
        if let Some(key) = var("SUPABASE_ANON_KEY") {
            config.postgrest.api_key = key;
        }
        config.postgrest.registration_rpc = var("MINDCARE_REGISTRATION_RPC");
        config.jwt_secret = var("MINDCARE_JWT_SECRET");
        if let Some(max) = var("MINDCARE_MAX_CONCURRENT") {
            config.max_concurrent_requests = max
                .parse()
                .with_context(|| format!("MINDCARE_MAX_CONCURRENT inválido: {}", max))?;
        }
        config.log_json = matches!(var("MINDCARE_LOG_JSON").as_deref(), Some("1" | "true"));

        if config.backend == StoreBackend::Supabase && config.postgrest.api_key.is_empty() {
            bail!("SUPABASE_ANON_KEY é obrigatória para o backend supabase");
        }

        Ok(config)
    }

    /// Constrói o store configurado
    pub async fn build_store(&self) -> Result<Arc<dyn ClinicStore>> {
        match self.backend {
            StoreBackend::Sqlite => {
                let store = SqliteStore::open(&self.db).await?;
                info!("Store SQLite em {}", self.db.db_path);
                Ok(Arc::new(store))
            }
            StoreBackend::Supabase => {
                let store = PostgrestStore::new(&self.postgrest)
                    .context("Falha ao configurar o cliente do store remoto")?;
                if self.postgrest.registration_rpc.is_none() {
                    warn!("MINDCARE_REGISTRATION_RPC ausente: cadastro será executado em etapas não atômicas");
                }
                info!("Store remoto em {}", self.postgrest.base_url);
                Ok(Arc::new(store))
            }
        }
    }
}
