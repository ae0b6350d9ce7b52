//! Página de agendamentos

use chrono::{DateTime, Local, TimeZone, Utc};
use clinic_store::models::{Appointment, AppointmentStatus};
use clinic_store::{ClinicStore, Collection, Embed, Query};

use crate::view::{Badge, Cell, PageState, PageView, TableView, Tone};

pub const COLUMNS: &[&str] = &["Data/Hora", "Duração", "Status", "Psicólogo", "Paciente"];
pub const EMPTY_MESSAGE: &str = "Nenhum agendamento encontrado";
const FAILURE_TITLE: &str = "Erro ao buscar agendamentos";

/// Todos os agendamentos, mais recentes primeiro, com os donos relacionados
pub fn query() -> Query {
    Query::from(Collection::Appointments)
        .embed(Embed::left(Collection::Psychologists, &["user_id"]))
        .embed(Embed::left(Collection::Patients, &["user_id"]))
        .order_desc("data_hora")
}

pub async fn load(store: &dyn ClinicStore) -> PageState<Appointment> {
    super::load(store, &query(), FAILURE_TITLE).await
}

/// Selo exibido para cada status
pub fn status_badge(status: &AppointmentStatus) -> Badge {
    match status {
        AppointmentStatus::Scheduled => Badge::new("Agendado", Tone::Blue),
        AppointmentStatus::Confirmed => Badge::new("Confirmado", Tone::Green),
        AppointmentStatus::InProgress => Badge::new("Em Atendimento", Tone::Yellow),
        AppointmentStatus::Completed => Badge::new("Concluído", Tone::Purple),
        AppointmentStatus::Cancelled => Badge::new("Cancelado", Tone::Red),
        AppointmentStatus::Unknown(_) => Badge::new("Desconhecido", Tone::Neutral),
    }
}

/// `dd/MM/yyyy às HH:mm` no fuso informado
pub fn format_scheduled_at<Tz>(scheduled_at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    scheduled_at
        .with_timezone(tz)
        .format("%d/%m/%Y às %H:%M")
        .to_string()
}

fn row<Tz>(appointment: &Appointment, tz: &Tz) -> Vec<Cell>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let psychologist = appointment.psychologist.as_ref().map(|p| p.user_id.to_string());
    let patient = appointment.patient.as_ref().map(|p| p.user_id.to_string());
    vec![
        Cell::text(format_scheduled_at(&appointment.scheduled_at, tz)),
        Cell::text(format!("{} min", appointment.duration_minutes)),
        Cell::badge(status_badge(&appointment.status)),
        Cell::or(psychologist.as_deref(), "N/A"),
        Cell::or(patient.as_deref(), "N/A"),
    ]
}

pub fn render_in<Tz>(state: &PageState<Appointment>, tz: &Tz) -> PageView
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    PageView {
        title: "Agendamentos",
        subtitle: "Gerencie os agendamentos da clínica",
        table: TableView::render(COLUMNS, state, EMPTY_MESSAGE, |a| row(a, tz)),
        notice: state.notice().cloned(),
    }
}

pub fn render(state: &PageState<Appointment>) -> PageView {
    render_in(state, &Local)
}
