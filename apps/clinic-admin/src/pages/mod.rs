//! Páginas de leitura do painel
//!
//! Cada página emite suas leituras ao ser exibida e converte o resultado em
//! uma visualização pronta. Falhas de leitura viram aviso destrutivo.

pub mod appointments;
pub mod dashboard;
pub mod patients;
pub mod psychologists;

use clinic_store::{decode_rows, ClinicStore, Query, StoreError};
use serde::de::DeserializeOwned;

use crate::view::PageState;

/// Executa a consulta e decodifica as linhas no tipo da página
pub(crate) async fn fetch<T: DeserializeOwned>(
    store: &dyn ClinicStore,
    query: &Query,
) -> Result<Vec<T>, StoreError> {
    let rows = store.select(query).await?;
    decode_rows(query.collection, rows)
}

/// Leitura única de uma página de listagem
pub(crate) async fn load<T: DeserializeOwned>(
    store: &dyn ClinicStore,
    query: &Query,
    failure_title: &str,
) -> PageState<T> {
    let result = fetch(store, query).await;
    if let Err(e) = &result {
        tracing::error!("{}: {}", failure_title, e);
    }
    PageState::from_result(result, failure_title)
}
