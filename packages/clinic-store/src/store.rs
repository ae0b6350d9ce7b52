//! Contrato do store remoto
//!
//! [`ClinicStore`] é a única fronteira externa do sistema: leituras
//! filtradas/ordenadas com junções, contagens, inserções, atualizações e a
//! criação de identidades. Páginas e o cadastro recebem o store por injeção.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::{RegistrationStep, StoreError};
use crate::models::{AuthUser, PatientRegistration, SignUp};
use crate::query::{Collection, Filter, FilterValue, Query, Row};

#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait ClinicStore: Send + Sync {
    /// Linhas da coleção conforme a consulta, com as junções embutidas
    async fn select(&self, query: &Query) -> Result<Vec<Value>, StoreError>;

    /// Quantidade de linhas que satisfazem a consulta (`head`)
    async fn count(&self, query: &Query) -> Result<u64, StoreError>;

    async fn insert(&self, collection: Collection, row: Row) -> Result<(), StoreError>;

    async fn update(&self, collection: Collection, patch: Row, filter: Filter) -> Result<(), StoreError>;

    /// Cria uma identidade; o perfil correspondente nasce com o nome dos metadados
    async fn sign_up(&self, request: &SignUp) -> Result<AuthUser, StoreError>;

    /// Cadastra um paciente (identidade, perfil, paciente e papel)
    ///
    /// A implementação padrão executa as quatro etapas em sequência, sem
    /// transação. Adaptadores capazes de executá-las atomicamente sobrescrevem
    /// este método.
    async fn register_patient(&self, registration: &PatientRegistration) -> Result<AuthUser, StoreError> {
        register_sequentially(self, registration).await
    }
}

/// Executa o cadastro em quatro chamadas sequenciais
///
/// Cada etapa só começa após o sucesso da anterior. Uma falha interrompe as
/// etapas restantes e não desfaz as já concluídas: uma falha na etapa 3 ou 4
/// deixa uma identidade e um perfil sem paciente ou sem papel.
pub async fn register_sequentially<S>(store: &S, registration: &PatientRegistration) -> Result<AuthUser, StoreError>
where
    S: ClinicStore + ?Sized,
{
    let user = store
        .sign_up(&registration.sign_up())
        .await
        .map_err(|e| e.at_step(RegistrationStep::SignUp))?;
    info!(user_id = %user.id, "Identidade criada para {}", registration.email);

    let steps = async {
        store
            .update(
                Collection::Profiles,
                registration.profile_patch(),
                Filter::eq("id", FilterValue::Uuid(user.id)),
            )
            .await
            .map_err(|e| e.at_step(RegistrationStep::UpdateProfile))?;

        store
            .insert(Collection::Patients, registration.patient_row(user.id))
            .await
            .map_err(|e| e.at_step(RegistrationStep::InsertPatient))?;

        store
            .insert(Collection::UserRoles, registration.role_row(user.id))
            .await
            .map_err(|e| e.at_step(RegistrationStep::AssignRole))
    };

    if let Err(e) = steps.await {
        error!(user_id = %user.id, "Cadastro interrompido: {}", e);
        warn!(user_id = %user.id, "Identidade criada permanece sem registro completo de paciente");
        return Err(e);
    }

    info!(user_id = %user.id, "Paciente cadastrado em quatro etapas");
    Ok(user)
}
