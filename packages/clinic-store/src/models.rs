//! Modelos de dados compartilhados entre aplicações
//!
//! Este módulo define as estruturas de dados principais usadas pelo sistema
//! de gestão da clínica. Os nomes de campo no store são os nomes em português
//! das colunas; os identificadores Rust ficam em inglês.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::query::Row;

/// Status possíveis de um agendamento
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppointmentStatus {
    /// Agendamento inicial, pendente de confirmação
    Scheduled,
    /// Confirmado pelo paciente
    Confirmed,
    /// Consulta em andamento
    InProgress,
    /// Consulta concluída
    Completed,
    /// Cancelado
    Cancelled,
    /// Código fora do conjunto conhecido, preservado como veio do store
    Unknown(String),
}

impl AppointmentStatus {
    /// Os cinco status conhecidos, na ordem do ciclo de vida
    pub const KNOWN: [AppointmentStatus; 5] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Confirmed,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    pub fn from_code(code: &str) -> Self {
        match code {
            "agendado" => AppointmentStatus::Scheduled,
            "confirmado" => AppointmentStatus::Confirmed,
            "em_atendimento" => AppointmentStatus::InProgress,
            "concluido" => AppointmentStatus::Completed,
            "cancelado" => AppointmentStatus::Cancelled,
            other => AppointmentStatus::Unknown(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            AppointmentStatus::Scheduled => "agendado",
            AppointmentStatus::Confirmed => "confirmado",
            AppointmentStatus::InProgress => "em_atendimento",
            AppointmentStatus::Completed => "concluido",
            AppointmentStatus::Cancelled => "cancelado",
            AppointmentStatus::Unknown(code) => code,
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for AppointmentStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for AppointmentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(AppointmentStatus::from_code(&code))
    }
}

/// Papéis atribuíveis a um usuário
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "psicologo")]
    Psychologist,
    #[serde(rename = "paciente")]
    Patient,
}

impl Role {
    pub fn code(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Psychologist => "psicologo",
            Role::Patient => "paciente",
        }
    }
}

/// Dados de perfil embutidos em listagens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    #[serde(rename = "nome_completo")]
    pub full_name: String,
    /// CPF
    #[serde(rename = "cpf", default)]
    pub national_id: Option<String>,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
}

/// Paciente com o perfil obrigatório (junção `!inner`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientListing {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "endereco", default)]
    pub address: Option<String>,
    #[serde(rename = "contato_emergencia", default)]
    pub emergency_contact: Option<String>,
    /// Convênio
    #[serde(rename = "convenio", default)]
    pub insurance: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "profiles")]
    pub profile: ProfileSummary,
}

/// Paciente recente exibido no dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentPatient {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "profiles")]
    pub profile: ProfileSummary,
}

/// Psicólogo cadastrado na clínica
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Psychologist {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Registro profissional (CRP)
    pub crp: String,
    #[serde(rename = "especializacao", default)]
    pub specialization: Option<String>,
    #[serde(rename = "valor_consulta", default)]
    pub consultation_fee: Option<f64>,
    #[serde(rename = "ativo")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Referência ao dono de uma linha relacionada
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerRef {
    pub user_id: Uuid,
}

/// Representa uma consulta/agendamento
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    /// Data e hora agendada para a consulta
    #[serde(rename = "data_hora")]
    pub scheduled_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    /// Duração prevista em minutos
    #[serde(rename = "duracao_minutos")]
    pub duration_minutes: i32,
    #[serde(rename = "psicologo_id", default)]
    pub psychologist_id: Option<Uuid>,
    #[serde(rename = "paciente_id", default)]
    pub patient_id: Option<Uuid>,
    /// Psicólogo embutido (junção à esquerda)
    #[serde(rename = "psicologos", default)]
    pub psychologist: Option<OwnerRef>,
    /// Paciente embutido (junção à esquerda)
    #[serde(rename = "pacientes", default)]
    pub patient: Option<OwnerRef>,
}

/// Identidade criada pelo subsistema de autenticação
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

/// Pedido de criação de identidade
pub struct SignUp {
    pub email: String,
    pub password: Zeroizing<String>,
    /// Metadados gravados junto à identidade (ex.: `nome_completo`)
    pub metadata: Row,
}

impl std::fmt::Debug for SignUp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUp")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// Dados validados para o cadastro de um paciente
///
/// Campos opcionais vazios já chegam como `None`.
pub struct PatientRegistration {
    pub full_name: String,
    pub email: String,
    /// Senha gerada para a identidade, nunca exibida
    pub password: Zeroizing<String>,
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub address: Option<String>,
    pub insurance: Option<String>,
    pub emergency_contact: Option<String>,
    pub notes: Option<String>,
}

impl std::fmt::Debug for PatientRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatientRegistration")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish_non_exhaustive()
    }
}

fn into_row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}

impl PatientRegistration {
    /// Etapa 1: identidade com o nome nos metadados
    pub fn sign_up(&self) -> SignUp {
        SignUp {
            email: self.email.clone(),
            password: self.password.clone(),
            metadata: into_row(json!({ "nome_completo": self.full_name })),
        }
    }

    /// Etapa 2: campos do perfil
    pub fn profile_patch(&self) -> Row {
        into_row(json!({
            "cpf": self.national_id,
            "telefone": self.phone,
            "data_nascimento": self.birth_date,
        }))
    }

    /// Etapa 3: linha de paciente
    pub fn patient_row(&self, user_id: Uuid) -> Row {
        into_row(json!({
            "user_id": user_id,
            "endereco": self.address,
            "convenio": self.insurance,
            "contato_emergencia": self.emergency_contact,
            "observacoes": self.notes,
        }))
    }

    /// Etapa 4: papel de paciente
    pub fn role_row(&self, user_id: Uuid) -> Row {
        into_row(json!({ "user_id": user_id, "role": Role::Patient.code() }))
    }
}
