//! Definições de erro para a biblioteca clinic-store
//!
//! Este módulo define os tipos de erro usados pelos adaptadores do store

use thiserror::Error;

use crate::query::Collection;

/// Etapas do cadastro de paciente, na ordem em que são executadas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStep {
    /// Criação da identidade de autenticação
    SignUp,
    /// Atualização do perfil criado pela identidade
    UpdateProfile,
    /// Inserção do registro de paciente
    InsertPatient,
    /// Atribuição do papel "paciente"
    AssignRole,
    /// Procedimento remoto que executa as quatro etapas de uma vez
    Procedure,
}

impl std::fmt::Display for RegistrationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationStep::SignUp => write!(f, "criação do usuário"),
            RegistrationStep::UpdateProfile => write!(f, "atualização do perfil"),
            RegistrationStep::InsertPatient => write!(f, "registro do paciente"),
            RegistrationStep::AssignRole => write!(f, "atribuição de papel"),
            RegistrationStep::Procedure => write!(f, "execução do procedimento de cadastro"),
        }
    }
}

/// Erros específicos para operações do store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Erro de conexão com o store: {0}")]
    ConnectionError(String),

    #[error("Erro de migração: {0}")]
    MigrationError(String),

    #[error("Erro de consulta: {0}")]
    QueryError(String),

    #[error("Erro de autenticação: {0}")]
    AuthError(String),

    #[error("Violação de restrição: {0}")]
    ConstraintViolation(String),

    #[error("Registro inválido em {collection}: {message}")]
    Decode {
        collection: Collection,
        message: String,
    },

    #[error("Falha na {step}: {source}")]
    Registration {
        step: RegistrationStep,
        #[source]
        source: Box<StoreError>,
    },

    #[error("Erro de criptografia: {0}")]
    CryptoError(String),

    #[error("Erro interno: {0}")]
    InternalError(String),
}

impl StoreError {
    /// Anexa a etapa do cadastro em que o erro ocorreu
    pub fn at_step(self, step: RegistrationStep) -> Self {
        StoreError::Registration {
            step,
            source: Box::new(self),
        }
    }

    /// Mensagem original do store, sem o prefixo da etapa
    pub fn message(&self) -> String {
        match self {
            StoreError::ConnectionError(msg)
            | StoreError::MigrationError(msg)
            | StoreError::QueryError(msg)
            | StoreError::AuthError(msg)
            | StoreError::ConstraintViolation(msg)
            | StoreError::CryptoError(msg)
            | StoreError::InternalError(msg) => msg.clone(),
            StoreError::Decode { message, .. } => message.clone(),
            StoreError::Registration { source, .. } => source.message(),
        }
    }

    /// Erro subjacente quando encapsulado por uma etapa do cadastro
    pub fn root(&self) -> &StoreError {
        match self {
            StoreError::Registration { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Classifica um erro do banco pelo código SQLite (primário ou estendido)
fn database_error(code: Option<&str>, message: &str) -> StoreError {
    match code {
        // SQLITE_CONSTRAINT e códigos estendidos (UNIQUE, FOREIGNKEY, CHECK)
        Some("19" | "275" | "787" | "1555" | "2067" | "23000") => {
            StoreError::ConstraintViolation(message.to_string())
        }
        // SQLITE_BUSY e SQLITE_LOCKED, inclusive estendidos
        Some("5" | "6" | "261" | "262" | "517") => StoreError::ConnectionError(message.to_string()),
        _ => StoreError::QueryError(message.to_string()),
    }
}

/// Conversão de erros específicos do SQLx para nossos tipos de erro
impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => StoreError::QueryError("Registro não encontrado".to_string()),
            sqlx::Error::Database(dbe) => {
                database_error(dbe.code().as_deref(), dbe.message())
            }
            sqlx::Error::ColumnNotFound(col) => {
                StoreError::QueryError(format!("Coluna não encontrada: {}", col))
            }
            sqlx::Error::ColumnDecode { index, source } => {
                StoreError::QueryError(format!("Erro ao decodificar coluna {}: {}", index, source))
            }
            sqlx::Error::Io(io_err) => StoreError::ConnectionError(io_err.to_string()),
            sqlx::Error::Configuration(conf_err) => StoreError::ConnectionError(conf_err.to_string()),
            sqlx::Error::PoolClosed => {
                StoreError::ConnectionError("Pool de conexões fechado".to_string())
            }
            sqlx::Error::PoolTimedOut => {
                StoreError::ConnectionError("Timeout no pool de conexões".to_string())
            }
            sqlx::Error::WorkerCrashed => {
                StoreError::InternalError("Worker do banco de dados falhou".to_string())
            }
            sqlx::Error::Migrate(err) => StoreError::MigrationError(err.to_string()),
            _ => StoreError::InternalError(format!("Erro inesperado: {:?}", error)),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            StoreError::QueryError(format!("Resposta inválida do store: {}", error))
        } else {
            StoreError::ConnectionError(error.to_string())
        }
    }
}
