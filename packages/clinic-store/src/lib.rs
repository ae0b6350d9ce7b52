//! Clinic Store - Biblioteca compartilhada de acesso ao store da clínica
//!
//! Esta biblioteca fornece:
//! - O contrato [`ClinicStore`] consumido pelas páginas e pelo cadastro
//! - Modelo de consulta genérico e decodificação tipada das linhas
//! - Adaptador SQLite local com migrações automáticas
//! - Adaptador HTTP para o store remoto (PostgREST + GoTrue)
//! - Geração e hash das senhas das identidades criadas

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::info;

pub mod crypto;
pub mod error;
pub mod migrations;
pub mod models;
pub mod postgrest;
pub mod query;
mod schema;
pub mod sqlite;
pub mod store;

pub use error::{RegistrationStep, StoreError};
pub use postgrest::{PostgrestConfig, PostgrestStore};
pub use query::{decode_rows, Collection, Embed, Filter, FilterValue, JoinKind, Query, Row};
pub use sqlite::SqliteStore;
pub use store::{register_sequentially, ClinicStore};

#[cfg(any(test, feature = "test-utils"))]
pub use store::MockClinicStore;

/// Configuração da conexão com o banco de dados local
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Caminho para o arquivo SQLite
    pub db_path: String,
    /// Número máximo de conexões no pool
    pub max_connections: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            db_path: "data/clinic.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Inicializa uma conexão com o banco de dados SQLite local
pub async fn init_db_pool(config: &DbConfig) -> Result<SqlitePool> {
    let db_path = Path::new(&config.db_path);

    // Verifica se o diretório pai existe
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .context("Falha ao criar diretório para banco de dados")?;
        }
    }

    let connection_options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .foreign_keys(true)
        .pragma("synchronous", "NORMAL");

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(connection_options)
        .await
        .context("Falha ao conectar ao banco de dados SQLite")?;

    migrations::run_migrations(&pool)
        .await
        .context("Falha ao aplicar migrações")?;

    info!("Banco de dados inicializado com sucesso: {}", config.db_path);
    Ok(pool)
}
