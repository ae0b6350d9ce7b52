use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{middleware, Json, Router};
use serde::Serialize;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_operator;
use crate::error::ApiError;
use crate::navigation::{self, Menu};
use crate::pages::{appointments, dashboard, patients, psychologists};
use crate::registration::{self, NewPatientForm, RegistrationOutcome};
use crate::state::AppState;
use crate::view::PageView;

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: crate::built_info::PKG_VERSION,
    })
}

async fn menu() -> Json<Menu> {
    Json(navigation::menu())
}

async fn dashboard_page(State(state): State<AppState>) -> Json<dashboard::DashboardView> {
    let now = state.clock.local();
    let loaded = dashboard::load(state.store.as_ref(), &now).await;
    Json(dashboard::render(&loaded))
}

async fn appointments_page(State(state): State<AppState>) -> Json<PageView> {
    Json(appointments::render(&appointments::load(state.store.as_ref()).await))
}

async fn psychologists_page(State(state): State<AppState>) -> Json<PageView> {
    Json(psychologists::render(&psychologists::load(state.store.as_ref()).await))
}

async fn patients_page(State(state): State<AppState>) -> Json<PageView> {
    Json(patients::render(&patients::load(state.store.as_ref()).await))
}

async fn create_patient(
    State(state): State<AppState>,
    Json(form): Json<NewPatientForm>,
) -> Result<(StatusCode, Json<RegistrationOutcome>), ApiError> {
    let outcome = registration::register_patient(state.store.as_ref(), form).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Monta o roteador completo do serviço
pub fn build_router(state: AppState, max_concurrent_requests: usize) -> Router {
    let api = Router::new()
        .route("/menu", get(menu))
        .route("/dashboard", get(dashboard_page))
        .route("/agendamentos", get(appointments_page))
        .route("/psicologos", get(psychologists_page))
        .route("/pacientes", get(patients_page).post(create_patient))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_operator));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(ConcurrencyLimitLayer::new(max_concurrent_requests))
        .with_state(state)
}
