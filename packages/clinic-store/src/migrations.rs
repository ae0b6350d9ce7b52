//! Sistema de migrações para o banco de dados local
//!
//! Este módulo gerencia as migrações do banco de dados SQLite

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::{error, info};

/// Lista de migrações SQL a serem aplicadas
pub(crate) const MIGRATIONS: &[&str] = &[
    // 001_initial_schema.sql
    r#"
    -- Identidades do subsistema de autenticação
    CREATE TABLE IF NOT EXISTS identities (
        id TEXT PRIMARY KEY NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    -- Perfis, um por identidade
    CREATE TABLE IF NOT EXISTS profiles (
        id TEXT PRIMARY KEY NOT NULL REFERENCES identities (id) ON DELETE CASCADE,
        nome_completo TEXT NOT NULL,
        cpf TEXT,
        telefone TEXT,
        data_nascimento TEXT,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS pacientes (
        id TEXT PRIMARY KEY NOT NULL,
        user_id TEXT NOT NULL REFERENCES profiles (id) ON DELETE CASCADE,
        endereco TEXT,
        convenio TEXT,
        contato_emergencia TEXT,
        observacoes TEXT,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS psicologos (
        id TEXT PRIMARY KEY NOT NULL,
        user_id TEXT NOT NULL REFERENCES profiles (id) ON DELETE CASCADE,
        crp TEXT NOT NULL,
        especializacao TEXT,
        valor_consulta REAL,
        ativo BOOLEAN NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS agendamentos (
        id TEXT PRIMARY KEY NOT NULL,
        data_hora TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'agendado'
            CHECK (status IN ('agendado', 'confirmado', 'em_atendimento', 'concluido', 'cancelado')),
        duracao_minutos INTEGER NOT NULL DEFAULT 50,
        psicologo_id TEXT REFERENCES psicologos (id) ON DELETE SET NULL,
        paciente_id TEXT REFERENCES pacientes (id) ON DELETE SET NULL,
        observacoes TEXT,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS user_roles (
        id TEXT PRIMARY KEY NOT NULL,
        user_id TEXT NOT NULL REFERENCES profiles (id) ON DELETE CASCADE,
        role TEXT NOT NULL CHECK (role IN ('admin', 'psicologo', 'paciente')),
        created_at TEXT NOT NULL,
        UNIQUE (user_id, role)
    );

    -- Índices para otimização
    CREATE INDEX IF NOT EXISTS idx_pacientes_user_id ON pacientes (user_id);
    CREATE INDEX IF NOT EXISTS idx_psicologos_user_id ON psicologos (user_id);
    CREATE INDEX IF NOT EXISTS idx_agendamentos_data_hora ON agendamentos (data_hora);
    CREATE INDEX IF NOT EXISTS idx_agendamentos_status ON agendamentos (status);
    "#,
];

/// Executa todas as migrações pendentes no banco de dados
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    info!("Aplicando migrações de banco de dados...");

    // Obter a versão atual do banco de dados
    let version: i64 = match sqlx::query_scalar("PRAGMA user_version").fetch_one(pool).await {
        Ok(v) => v,
        Err(e) => {
            error!("Erro ao obter versão do banco: {}", e);
            // Primeira execução em um arquivo recém-criado
            0
        }
    };

    info!("Versão atual do banco: {}", version);

    for (i, migration_sql) in MIGRATIONS.iter().enumerate() {
        let migration_version = (i + 1) as i64;

        if migration_version <= version {
            info!("Migração {} já aplicada", migration_version);
            continue;
        }

        info!("Aplicando migração {}...", migration_version);

        let mut transaction = pool
            .begin()
            .await
            .with_context(|| format!("Falha ao iniciar transação para migração {}", migration_version))?;

        sqlx::query(migration_sql)
            .execute(&mut *transaction)
            .await
            .with_context(|| format!("Falha ao executar migração {}", migration_version))?;

        sqlx::query(&format!("PRAGMA user_version = {}", migration_version))
            .execute(&mut *transaction)
            .await
            .with_context(|| format!("Falha ao atualizar versão para {}", migration_version))?;

        transaction
            .commit()
            .await
            .with_context(|| format!("Falha ao confirmar transação para migração {}", migration_version))?;

        info!("Migração {} aplicada com sucesso", migration_version);
    }

    info!("Migrações concluídas. Versão atual: {}", MIGRATIONS.len());
    Ok(())
}
