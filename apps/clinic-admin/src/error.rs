//! Erros da API administrativa

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use clinic_store::StoreError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::view::Notice;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Dados inválidos")]
    Validation(BTreeMap<String, Vec<String>>),

    #[error("Não autorizado: {0}")]
    Unauthorized(String),

    /// Falha do store durante uma operação com aviso ao operador
    #[error("{title}: {source}")]
    Store {
        title: &'static str,
        #[source]
        source: StoreError,
    },
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<Notice>,
}

impl ApiError {
    pub fn store(title: &'static str, source: StoreError) -> Self {
        ApiError::Store { title, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Store { source, .. } => match source.root() {
                StoreError::AuthError(_) | StoreError::ConstraintViolation(_) => StatusCode::CONFLICT,
                StoreError::QueryError(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(fields) => ErrorBody {
                error: "Dados inválidos".to_string(),
                fields: Some(fields),
                notice: None,
            },
            ApiError::Unauthorized(msg) => ErrorBody {
                error: msg,
                fields: None,
                notice: None,
            },
            ApiError::Store { title, source } => {
                error!("{}: {}", title, source);
                let message = source.message();
                ErrorBody {
                    error: message.clone(),
                    fields: None,
                    notice: Some(Notice::destructive(title, message)),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
