//! Página de psicólogos

use clinic_store::models::Psychologist;
use clinic_store::{ClinicStore, Collection, Query};

use crate::view::{Badge, Cell, PageState, PageView, TableView, Tone};

pub const COLUMNS: &[&str] = &["CRP", "Especialização", "Valor Consulta", "Status"];
pub const EMPTY_MESSAGE: &str = "Nenhum psicólogo cadastrado";
const FAILURE_TITLE: &str = "Erro ao buscar psicólogos";

pub fn query() -> Query {
    Query::from(Collection::Psychologists).order_desc("created_at")
}

pub async fn load(store: &dyn ClinicStore) -> PageState<Psychologist> {
    super::load(store, &query(), FAILURE_TITLE).await
}

/// `R$ 150.00`, ou "N/A" sem valor definido
pub fn format_fee(fee: Option<f64>) -> String {
    match fee {
        Some(value) => format!("R$ {:.2}", value),
        None => "N/A".to_string(),
    }
}

pub fn active_badge(active: bool) -> Badge {
    if active {
        Badge::new("Ativo", Tone::Green)
    } else {
        Badge::new("Inativo", Tone::Neutral)
    }
}

fn row(psychologist: &Psychologist) -> Vec<Cell> {
    vec![
        Cell::text(&psychologist.crp),
        Cell::or(psychologist.specialization.as_deref(), "N/A"),
        Cell::text(format_fee(psychologist.consultation_fee)),
        Cell::badge(active_badge(psychologist.active)),
    ]
}

pub fn render(state: &PageState<Psychologist>) -> PageView {
    PageView {
        title: "Psicólogos",
        subtitle: "Gerencie os psicólogos da clínica",
        table: TableView::render(COLUMNS, state, EMPTY_MESSAGE, row),
        notice: state.notice().cloned(),
    }
}
