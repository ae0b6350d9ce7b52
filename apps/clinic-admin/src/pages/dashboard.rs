//! Dashboard: contagens gerais, consultas de hoje e pacientes recentes

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use clinic_store::models::RecentPatient;
use clinic_store::{ClinicStore, Collection, Embed, Filter, FilterValue, Query, StoreError};
use serde::Serialize;
use tracing::error;

use crate::view::{Cell, Notice, PageState, TableView};

pub const RECENT_COLUMNS: &[&str] = &["Nome", "CPF"];
pub const RECENT_LIMIT: u32 = 5;
const RECENT_EMPTY_MESSAGE: &str = "Nenhum paciente cadastrado";
const FAILURE_TITLE: &str = "Erro ao carregar dashboard";

/// Meia-noite local da data, em UTC
///
/// Em fusos cuja mudança de horário ocorre à meia-noite, a data começa na
/// primeira hora local existente.
fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::default());
    (0..3)
        .find_map(|hour| {
            tz.from_local_datetime(&(midnight + Duration::hours(hour)))
                .earliest()
        })
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

/// Intervalo `[início de hoje, início de amanhã)` no fuso de `now`
pub fn today_interval<Tz: TimeZone>(now: &DateTime<Tz>) -> (DateTime<Utc>, DateTime<Utc>) {
    let tz = now.timezone();
    let today = now.date_naive();
    (
        start_of_day(&tz, today),
        start_of_day(&tz, today + Duration::days(1)),
    )
}

pub fn appointments_between(start: DateTime<Utc>, end: DateTime<Utc>) -> Query {
    Query::from(Collection::Appointments)
        .filter(Filter::gte("data_hora", FilterValue::Timestamp(start)))
        .filter(Filter::lt("data_hora", FilterValue::Timestamp(end)))
}

pub fn recent_patients_query() -> Query {
    Query::from(Collection::Patients)
        .columns(&["id", "created_at"])
        .embed(Embed::inner(Collection::Profiles, &["nome_completo", "cpf"]))
        .order_desc("created_at")
        .limit(RECENT_LIMIT)
}

/// Contagens exibidas nos cartões
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub psychologists: u64,
    pub patients: u64,
    pub appointments: u64,
    pub appointments_today: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub cards: Vec<StatCard>,
    pub recent_patients: TableView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent_patients: PageState<RecentPatient>,
    /// Primeira falha entre as cinco leituras
    pub notice: Option<Notice>,
}

fn settle(result: Result<u64, StoreError>, label: &str, failure: &mut Option<StoreError>) -> u64 {
    match result {
        Ok(count) => count,
        Err(e) => {
            error!("Falha ao contar {}: {}", label, e);
            failure.get_or_insert(e);
            0
        }
    }
}

/// Emite as cinco leituras concorrentemente
///
/// Cada leitura é independente: uma falha zera apenas o próprio cartão e
/// gera o aviso do dashboard.
pub async fn load<Tz: TimeZone>(store: &dyn ClinicStore, now: &DateTime<Tz>) -> Dashboard {
    let (start, end) = today_interval(now);
    let psychologists = Query::from(Collection::Psychologists);
    let patients = Query::from(Collection::Patients);
    let appointments = Query::from(Collection::Appointments);
    let today = appointments_between(start, end);
    let recent = recent_patients_query();

    let (psychologists, patients, appointments, today, recent) = tokio::join!(
        store.count(&psychologists),
        store.count(&patients),
        store.count(&appointments),
        store.count(&today),
        super::fetch::<RecentPatient>(store, &recent),
    );

    let mut failure = None;
    let stats = DashboardStats {
        psychologists: settle(psychologists, "psicólogos", &mut failure),
        patients: settle(patients, "pacientes", &mut failure),
        appointments: settle(appointments, "agendamentos", &mut failure),
        appointments_today: settle(today, "agendamentos de hoje", &mut failure),
    };
    let recent_patients = match recent {
        Ok(rows) if rows.is_empty() => PageState::Empty,
        Ok(rows) => PageState::Populated(rows),
        Err(e) => {
            error!("Falha ao buscar pacientes recentes: {}", e);
            failure.get_or_insert(e);
            PageState::Empty
        }
    };

    Dashboard {
        stats,
        recent_patients,
        notice: failure.map(|e| Notice::destructive(FAILURE_TITLE, e.message())),
    }
}

pub fn render(dashboard: &Dashboard) -> DashboardView {
    let stats = dashboard.stats;
    DashboardView {
        title: "Dashboard",
        subtitle: "Visão geral da clínica",
        cards: vec![
            StatCard { title: "Psicólogos", value: stats.psychologists },
            StatCard { title: "Pacientes", value: stats.patients },
            StatCard { title: "Agendamentos Geral", value: stats.appointments },
            StatCard { title: "Hoje", value: stats.appointments_today },
        ],
        recent_patients: TableView::render(
            RECENT_COLUMNS,
            &dashboard.recent_patients,
            RECENT_EMPTY_MESSAGE,
            |p| {
                vec![
                    Cell::text(&p.profile.full_name),
                    Cell::or(p.profile.national_id.as_deref(), "N/A"),
                ]
            },
        ),
        notice: dashboard.notice.clone(),
    }
}
