//! Cadastro de pacientes
//!
//! O formulário é validado antes de qualquer chamada ao store. Com dados
//! válidos, uma senha aleatória é gerada para a nova identidade e o store
//! executa as quatro etapas do cadastro. Em seguida a lista de pacientes é
//! relida.

use std::collections::BTreeMap;

use clinic_store::crypto::generate_password;
use clinic_store::models::PatientRegistration;
use clinic_store::ClinicStore;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};
use zeroize::Zeroizing;

use crate::error::ApiError;
use crate::pages::patients;
use crate::view::{Notice, PageView};

const FAILURE_TITLE: &str = "Erro ao cadastrar paciente";

/// Formulário de novo paciente
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewPatientForm {
    #[serde(rename = "nome_completo", default)]
    #[validate(length(min = 3, message = "Nome é obrigatório (mínimo 3 caracteres)"))]
    pub full_name: String,
    #[serde(default)]
    #[validate(email(message = "Email inválido"))]
    pub email: String,
    #[serde(rename = "cpf", default)]
    pub national_id: Option<String>,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(rename = "data_nascimento", default)]
    pub birth_date: Option<String>,
    #[serde(rename = "endereco", default)]
    pub address: Option<String>,
    #[serde(rename = "convenio", default)]
    pub insurance: Option<String>,
    #[serde(rename = "contato_emergencia", default)]
    pub emergency_contact: Option<String>,
    #[serde(rename = "observacoes", default)]
    pub notes: Option<String>,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Nome do campo como enviado pelo cliente
fn wire_name(field: &str) -> &str {
    match field {
        "full_name" => "nome_completo",
        other => other,
    }
}

fn field_errors(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (wire_name(field).to_string(), messages)
        })
        .collect()
}

impl NewPatientForm {
    /// Remove espaços das bordas e converte campos opcionais vazios em `None`
    pub fn normalized(self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            national_id: blank_to_none(self.national_id),
            phone: blank_to_none(self.phone),
            birth_date: blank_to_none(self.birth_date),
            address: blank_to_none(self.address),
            insurance: blank_to_none(self.insurance),
            emergency_contact: blank_to_none(self.emergency_contact),
            notes: blank_to_none(self.notes),
        }
    }

    /// Normaliza e valida; erros vêm agrupados por campo
    pub fn into_valid(self) -> Result<Self, BTreeMap<String, Vec<String>>> {
        let form = self.normalized();
        form.validate().map_err(|e| field_errors(&e))?;
        Ok(form)
    }

    pub fn into_registration(self, password: Zeroizing<String>) -> PatientRegistration {
        PatientRegistration {
            full_name: self.full_name,
            email: self.email,
            password,
            national_id: self.national_id,
            phone: self.phone,
            birth_date: self.birth_date,
            address: self.address,
            insurance: self.insurance,
            emergency_contact: self.emergency_contact,
            notes: self.notes,
        }
    }
}

/// Resultado de um cadastro bem-sucedido
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationOutcome {
    pub user_id: Uuid,
    pub notice: Notice,
    /// Lista de pacientes relida após o cadastro
    pub patients: PageView,
}

/// Valida o formulário e cadastra o paciente
pub async fn register_patient(
    store: &dyn ClinicStore,
    form: NewPatientForm,
) -> Result<RegistrationOutcome, ApiError> {
    let form = form.into_valid().map_err(ApiError::Validation)?;
    let full_name = form.full_name.clone();
    let registration = form.into_registration(generate_password());

    let user = store
        .register_patient(&registration)
        .await
        .map_err(|e| ApiError::store(FAILURE_TITLE, e))?;
    info!(user_id = %user.id, "Paciente cadastrado: {}", full_name);

    let refreshed = patients::load(store).await;
    Ok(RegistrationOutcome {
        user_id: user.id,
        notice: Notice::success(
            "Paciente Cadastrado!",
            format!("{} foi adicionado(a) com sucesso.", full_name),
        ),
        patients: patients::render(&refreshed),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_store::models::{AuthUser, PatientListing};
    use clinic_store::{decode_rows, Collection, DbConfig, MockClinicStore, SqliteStore, StoreError};
    use clinic_store::crypto::GENERATED_PASSWORD_LEN;

    fn form(name: &str, email: &str) -> NewPatientForm {
        NewPatientForm {
            full_name: name.to_string(),
            email: email.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validation_messages() {
        let errors = form("Jo", "nao-e-email").into_valid().unwrap_err();
        assert_eq!(
            errors["nome_completo"],
            ["Nome é obrigatório (mínimo 3 caracteres)"]
        );
        assert_eq!(errors["email"], ["Email inválido"]);
    }

    #[test]
    fn test_blank_optional_fields_become_none() {
        let mut input = form("  Ana Lima ", "ana@exemplo.com");
        input.phone = Some("   ".to_string());
        input.insurance = Some(" Unimed ".to_string());

        let valid = input.into_valid().unwrap();
        assert_eq!(valid.full_name, "Ana Lima");
        assert_eq!(valid.phone, None);
        assert_eq!(valid.insurance.as_deref(), Some("Unimed"));
    }

    #[tokio::test]
    async fn test_invalid_input_issues_no_store_call() {
        // Sem expectativas: qualquer chamada ao mock falha o teste
        let store = MockClinicStore::new();

        for input in [form("Jo", "jo@exemplo.com"), form("João Souza", "joao@"), form("", "")] {
            let result = register_patient(&store, input).await;
            assert!(matches!(result, Err(ApiError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_destructive_notice() {
        let mut store = MockClinicStore::new();
        store
            .expect_register_patient()
            .times(1)
            .returning(|_| Err(StoreError::AuthError("User already registered".to_string())));
        store.expect_select().times(0);

        let result = register_patient(&store, form("João Souza", "joao@exemplo.com")).await;
        match result {
            Err(ApiError::Store { title, source }) => {
                assert_eq!(title, "Erro ao cadastrar paciente");
                assert_eq!(source.message(), "User already registered");
            }
            other => panic!("resultado inesperado: {:?}", other.map(|o| o.user_id)),
        }
    }

    #[tokio::test]
    async fn test_generated_password_reaches_store() {
        let mut store = MockClinicStore::new();
        let user_id = Uuid::new_v4();
        store.expect_register_patient().times(1).returning(move |registration| {
            assert_eq!(registration.password.len(), GENERATED_PASSWORD_LEN);
            assert!(registration.password.chars().all(|c| c.is_ascii_alphanumeric()));
            Ok(AuthUser {
                id: user_id,
                email: registration.email.clone(),
            })
        });
        store.expect_select().times(1).returning(|_| Ok(Vec::new()));

        let outcome = register_patient(&store, form("Carla Dias", "carla@exemplo.com")).await.unwrap();
        assert_eq!(outcome.user_id, user_id);
        assert_eq!(outcome.notice.title, "Paciente Cadastrado!");
        assert_eq!(outcome.notice.description, "Carla Dias foi adicionado(a) com sucesso.");
    }

    #[tokio::test]
    async fn test_successful_registration_adds_exactly_one_listed_patient() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = SqliteStore::open(&DbConfig {
            db_path: dir.path().join("cadastro.db").display().to_string(),
            max_connections: 2,
        })
        .await?;

        register_patient(&store, form("Ana Lima", "ana@exemplo.com")).await?;
        let before = store.count(&patients::query()).await?;

        let mut input = form("Bruno Reis", "bruno@exemplo.com");
        input.national_id = Some("987.654.321-00".to_string());
        input.insurance = Some("Bradesco Saúde".to_string());
        input.emergency_contact = Some("".to_string());
        let outcome = register_patient(&store, input).await?;

        assert_eq!(store.count(&patients::query()).await?, before + 1);
        assert_eq!(outcome.patients.table.rows.len(), 2);

        let listed: Vec<PatientListing> =
            decode_rows(Collection::Patients, store.select(&patients::query()).await?)?;
        let added: Vec<_> = listed.iter().filter(|p| p.user_id == outcome.user_id).collect();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].profile.full_name, "Bruno Reis");
        assert_eq!(added[0].profile.national_id.as_deref(), Some("987.654.321-00"));
        assert_eq!(added[0].insurance.as_deref(), Some("Bradesco Saúde"));
        assert_eq!(added[0].emergency_contact, None);
        assert_eq!(added[0].address, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected_without_new_rows() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = SqliteStore::open(&DbConfig {
            db_path: dir.path().join("duplicado.db").display().to_string(),
            max_connections: 2,
        })
        .await?;

        register_patient(&store, form("Ana Lima", "ana@exemplo.com")).await?;
        let result = register_patient(&store, form("Outra Ana", "ana@exemplo.com")).await;

        assert!(matches!(result, Err(ApiError::Store { .. })));
        assert_eq!(store.count(&patients::query()).await?, 1);
        Ok(())
    }
}
