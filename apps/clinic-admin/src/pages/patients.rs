//! Página de pacientes

use clinic_store::models::PatientListing;
use clinic_store::{ClinicStore, Collection, Embed, Query};

use crate::view::{Cell, PageState, PageView, TableView};

pub const COLUMNS: &[&str] = &["Nome", "CPF", "Telefone", "Convênio", "Contato Emergência"];
pub const EMPTY_MESSAGE: &str = "Nenhum paciente cadastrado";
const FAILURE_TITLE: &str = "Erro ao buscar pacientes";

/// Pacientes com perfil obrigatório, mais recentes primeiro
pub fn query() -> Query {
    Query::from(Collection::Patients)
        .columns(&["id", "user_id", "endereco", "convenio", "contato_emergencia", "created_at"])
        .embed(Embed::inner(Collection::Profiles, &["nome_completo", "cpf", "telefone"]))
        .order_desc("created_at")
}

pub async fn load(store: &dyn ClinicStore) -> PageState<PatientListing> {
    super::load(store, &query(), FAILURE_TITLE).await
}

fn row(patient: &PatientListing) -> Vec<Cell> {
    vec![
        Cell::text(&patient.profile.full_name),
        Cell::or(patient.profile.national_id.as_deref(), "N/A"),
        Cell::or(patient.profile.phone.as_deref(), "N/A"),
        Cell::or(patient.insurance.as_deref(), "Particular"),
        Cell::or(patient.emergency_contact.as_deref(), "N/A"),
    ]
}

pub fn render(state: &PageState<PatientListing>) -> PageView {
    PageView {
        title: "Pacientes",
        subtitle: "Gerencie os pacientes da clínica",
        table: TableView::render(COLUMNS, state, EMPTY_MESSAGE, row),
        notice: state.notice().cloned(),
    }
}
