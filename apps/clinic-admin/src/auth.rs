//! Autenticação dos operadores
//!
//! Com um segredo configurado, toda rota `/api` exige
//! `Authorization: Bearer <jwt>` assinado com HS256.

use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

/// Claims do token de operador
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorClaims {
    pub sub: String,
    pub exp: u64,
    #[serde(default)]
    pub email: Option<String>,
}

/// Verificador de tokens de operador
pub struct OperatorAuth {
    key: DecodingKey,
    validation: Validation,
}

impl OperatorAuth {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<OperatorClaims, ApiError> {
        decode::<OperatorClaims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                warn!("Token de operador rejeitado: {}", e);
                ApiError::Unauthorized("Token inválido ou expirado".to_string())
            })
    }
}

fn bearer_token<B>(req: &Request<B>) -> Option<&str> {
    req.headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

/// Middleware que exige um operador autenticado
///
/// Sem segredo configurado a requisição segue direto.
pub async fn require_operator<B>(
    State(state): State<AppState>,
    mut req: Request<B>,
    next: Next<B>,
) -> Result<Response, ApiError> {
    if let Some(auth) = &state.auth {
        let token = bearer_token(&req)
            .ok_or_else(|| ApiError::Unauthorized("Autenticação necessária".to_string()))?;
        let claims = auth.verify(token)?;
        req.extensions_mut().insert(claims);
    }
    Ok(next.run(req).await)
}
