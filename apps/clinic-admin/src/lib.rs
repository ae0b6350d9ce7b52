//! Clinic Admin - Serviço administrativo da clínica MindCare
//!
//! Expõe em HTTP as páginas do painel (dashboard, agendamentos, psicólogos
//! e pacientes), o menu lateral e o cadastro de pacientes sobre um
//! [`clinic_store::ClinicStore`].

pub mod auth;
pub mod config;
pub mod error;
pub mod navigation;
pub mod pages;
pub mod registration;
pub mod routes;
pub mod state;
pub mod view;

pub use config::{AdminConfig, StoreBackend};
pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;

/// Informações geradas em tempo de compilação
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
