//! Adaptador HTTP para o store remoto (PostgREST + GoTrue)
//!
//! Traduz o contrato de [`ClinicStore`] para as rotas `/rest/v1` e
//! `/auth/v1` de um projeto Supabase. Nenhuma chamada é repetida
//! automaticamente e não há timeout além do padrão do cliente.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::error::{RegistrationStep, StoreError};
use crate::models::{AuthUser, PatientRegistration, SignUp};
use crate::query::{Collection, Filter, Query, Row};
use crate::store::{register_sequentially, ClinicStore};

/// Configuração do store remoto
#[derive(Debug, Clone)]
pub struct PostgrestConfig {
    /// URL do projeto, ex.: `https://xyz.supabase.co`
    pub base_url: String,
    /// Chave enviada em `apikey` e `Authorization`
    pub api_key: String,
    /// Procedimento transacional de cadastro (`/rest/v1/rpc/{nome}`)
    pub registration_rpc: Option<String>,
}

impl Default for PostgrestConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            api_key: "".to_string(), // Deve ser definida explicitamente
            registration_rpc: None,
        }
    }
}

/// Cliente do store remoto
#[derive(Debug, Clone)]
pub struct PostgrestStore {
    client: Client,
    base_url: Url,
    registration_rpc: Option<String>,
}

impl PostgrestStore {
    pub fn new(config: &PostgrestConfig) -> Result<Self, StoreError> {
        let mut base_url = Url::parse(&config.base_url)
            .map_err(|e| StoreError::ConnectionError(format!("URL inválida {}: {}", config.base_url, e)))?;
        // `join` substitui o último segmento quando falta a barra final
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| StoreError::ConnectionError(format!("Chave de API inválida: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| StoreError::ConnectionError(format!("Chave de API inválida: {}", e)))?;
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url,
            registration_rpc: config.registration_rpc.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        self.base_url
            .join(path)
            .map_err(|e| StoreError::ConnectionError(format!("Rota inválida {}: {}", path, e)))
    }

    fn table_url(&self, collection: Collection) -> Result<Url, StoreError> {
        self.endpoint(&format!("rest/v1/{}", collection.table_name()))
    }

    /// URL de leitura com `select`, filtros, ordenação e limite
    pub fn query_url(&self, query: &Query) -> Result<Url, StoreError> {
        let mut url = self.table_url(query.collection)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", &query.select_clause());
            for filter in &query.filters {
                append_filter(&mut pairs, filter);
            }
            if let Some(order) = query.order {
                let direction = if order.ascending { "asc" } else { "desc" };
                pairs.append_pair("order", &format!("{}.{}", order.column, direction));
            }
            if let Some(limit) = query.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }
        Ok(url)
    }
}

fn append_filter(pairs: &mut url::form_urlencoded::Serializer<'_, url::UrlQuery<'_>>, filter: &Filter) {
    pairs.append_pair(
        filter.column,
        &format!("{}.{}", filter.op.postgrest(), filter.value.to_param()),
    );
}

/// Extrai a mensagem de um corpo de erro do PostgREST ou do GoTrue
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.to_string())
}

/// Converte respostas não 2xx em erro, preservando a mensagem do store
async fn check(response: Response, auth: bool) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);
    debug!(status = status.as_u16(), "Store respondeu com erro: {}", message);
    Err(match status.as_u16() {
        _ if status.is_server_error() => StoreError::ConnectionError(message),
        _ if auth => StoreError::AuthError(message),
        409 => StoreError::ConstraintViolation(message),
        401 | 403 => StoreError::AuthError(message),
        _ => StoreError::QueryError(message),
    })
}

async fn send(request: RequestBuilder, auth: bool) -> Result<Response, StoreError> {
    check(request.send().await?, auth).await
}

/// Total de um cabeçalho `Content-Range`, ex.: `0-24/57` ou `*/57`
fn parse_content_range(value: &str) -> Option<u64> {
    value.rsplit('/').next()?.trim().parse().ok()
}

fn user_from_signup(body: &Value) -> Result<AuthUser, StoreError> {
    let user = body.get("user").filter(|u| !u.is_null()).unwrap_or(body);
    let id = user
        .get("id")
        .and_then(Value::as_str)
        .and_then(|id| Uuid::parse_str(id).ok())
        .ok_or_else(|| StoreError::AuthError("Criação do usuário falhou.".to_string()))?;
    let email = user
        .get("email")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Ok(AuthUser { id, email })
}

#[async_trait]
impl ClinicStore for PostgrestStore {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, StoreError> {
        let url = self.query_url(query)?;
        debug!(%url, "Consultando store remoto");
        let response = send(self.client.get(url), false).await?;
        let body: Value = response.json().await?;
        match body {
            Value::Array(rows) => Ok(rows),
            other => Err(StoreError::Decode {
                collection: query.collection,
                message: format!("esperava uma lista, recebeu {}", other),
            }),
        }
    }

    async fn count(&self, query: &Query) -> Result<u64, StoreError> {
        let url = self.query_url(query)?;
        let response = send(self.client.head(url).header("Prefer", "count=exact"), false).await?;
        response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range)
            .ok_or_else(|| StoreError::QueryError("Contagem ausente na resposta".to_string()))
    }

    async fn insert(&self, collection: Collection, row: Row) -> Result<(), StoreError> {
        let url = self.table_url(collection)?;
        send(
            self.client
                .post(url)
                .header("Prefer", "return=minimal")
                .json(&row),
            false,
        )
        .await?;
        Ok(())
    }

    async fn update(&self, collection: Collection, patch: Row, filter: Filter) -> Result<(), StoreError> {
        let mut url = self.table_url(collection)?;
        append_filter(&mut url.query_pairs_mut(), &filter);
        send(
            self.client
                .patch(url)
                .header("Prefer", "return=minimal")
                .json(&patch),
            false,
        )
        .await?;
        Ok(())
    }

    async fn sign_up(&self, request: &SignUp) -> Result<AuthUser, StoreError> {
        let url = self.endpoint("auth/v1/signup")?;
        let payload = json!({
            "email": request.email,
            "password": request.password.as_str(),
            "data": request.metadata,
        });
        let response = send(self.client.post(url).json(&payload), true).await?;
        let body: Value = response.json().await?;
        let user = user_from_signup(&body)?;
        info!(user_id = %user.id, "Identidade criada no store remoto");
        Ok(user)
    }

    async fn register_patient(&self, registration: &PatientRegistration) -> Result<AuthUser, StoreError> {
        let Some(rpc) = &self.registration_rpc else {
            warn!("Procedimento de cadastro não configurado; executando etapas sem transação");
            return register_sequentially(self, registration).await;
        };

        let url = self.endpoint(&format!("rest/v1/rpc/{}", rpc))?;
        let mut patient = registration.patient_row(Uuid::nil());
        patient.remove("user_id");
        let payload = json!({
            "email": registration.email,
            "password": registration.password.as_str(),
            "nome_completo": registration.full_name,
            "perfil": registration.profile_patch(),
            "paciente": patient,
        });
        let response = send(self.client.post(url).json(&payload), false)
            .await
            .map_err(|e| e.at_step(RegistrationStep::Procedure))?;
        let body: Value = response.json().await?;
        let id = body
            .as_str()
            .or_else(|| body.get("user_id").and_then(Value::as_str))
            .and_then(|id| Uuid::parse_str(id).ok())
            .ok_or_else(|| StoreError::QueryError("Procedimento de cadastro não retornou o usuário".to_string()))?;

        info!(user_id = %id, "Paciente cadastrado pelo procedimento {}", rpc);
        Ok(AuthUser {
            id,
            email: registration.email.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatientListing;
    use crate::query::{decode_rows, Embed, FilterValue};
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use zeroize::Zeroizing;

    fn store_for(server: &MockServer, rpc: Option<&str>) -> PostgrestStore {
        PostgrestStore::new(&PostgrestConfig {
            base_url: server.uri(),
            api_key: "chave-anon".to_string(),
            registration_rpc: rpc.map(str::to_string),
        })
        .unwrap()
    }

    fn registration() -> PatientRegistration {
        PatientRegistration {
            full_name: "Carla Dias".to_string(),
            email: "carla@exemplo.com".to_string(),
            password: Zeroizing::new("p".repeat(32)),
            national_id: None,
            phone: None,
            birth_date: None,
            address: None,
            insurance: Some("Particular".to_string()),
            emergency_contact: None,
            notes: None,
        }
    }

    #[test]
    fn test_parse_content_range() {
        assert_eq!(parse_content_range("0-24/57"), Some(57));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("*/*"), None);
    }

    #[test]
    fn test_error_message_prefers_store_fields() {
        assert_eq!(error_message(r#"{"msg":"User already registered"}"#), "User already registered");
        assert_eq!(error_message(r#"{"message":"duplicate key","code":"23505"}"#), "duplicate key");
        assert_eq!(error_message("texto simples"), "texto simples");
    }

    #[tokio::test]
    async fn test_select_builds_postgrest_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/pacientes"))
            .and(query_param("select", "id,user_id,created_at,profiles:profiles!inner(nome_completo,cpf,telefone)"))
            .and(query_param("order", "created_at.desc"))
            .and(header("apikey", "chave-anon"))
            .and(header("authorization", "Bearer chave-anon"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": "0b9a6f4e-6a53-4c33-9f5f-3b0f1f6b2a11",
                "user_id": "9d7f2a0e-1b2c-4d5e-8f90-a1b2c3d4e5f6",
                "created_at": "2026-10-19T12:00:00.123456+00:00",
                "profiles": { "nome_completo": "Carla Dias", "cpf": null, "telefone": null }
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server, None);
        let query = Query::from(Collection::Patients)
            .columns(&["id", "user_id", "created_at"])
            .embed(Embed::inner(Collection::Profiles, &["nome_completo", "cpf", "telefone"]))
            .order_desc("created_at");

        let rows = store.select(&query).await.unwrap();
        let patients: Vec<PatientListing> = decode_rows(Collection::Patients, rows).unwrap();
        assert_eq!(patients[0].profile.full_name, "Carla Dias");
        assert_eq!(patients[0].insurance, None);
    }

    #[tokio::test]
    async fn test_count_reads_content_range() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/rest/v1/agendamentos"))
            .and(query_param("data_hora", "gte.2026-10-19T03:00:00Z"))
            .and(header("prefer", "count=exact"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-range", "*/7"))
            .mount(&server)
            .await;

        let store = store_for(&server, None);
        let start = Utc.with_ymd_and_hms(2026, 10, 19, 3, 0, 0).unwrap();
        let query = Query::from(Collection::Appointments)
            .filter(Filter::gte("data_hora", FilterValue::Timestamp(start)));

        assert_eq!(store.count(&query).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_signup_error_surfaces_auth_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(
                ResponseTemplate::new(422).set_body_json(json!({ "msg": "User already registered" })),
            )
            .mount(&server)
            .await;

        let store = store_for(&server, None);
        let err = store.sign_up(&registration().sign_up()).await.unwrap_err();

        assert!(matches!(err, StoreError::AuthError(ref msg) if msg == "User already registered"));
    }

    #[tokio::test]
    async fn test_signup_outage_is_not_an_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({ "msg": "upstream indisponível" })))
            .mount(&server)
            .await;

        let store = store_for(&server, None);
        let err = store.sign_up(&registration().sign_up()).await.unwrap_err();

        assert!(matches!(err, StoreError::ConnectionError(ref msg) if msg == "upstream indisponível"));
    }

    #[tokio::test]
    async fn test_sequential_registration_hits_four_endpoints() {
        let server = MockServer::start().await;
        let user_id = "5e0c4f1a-2b3c-4d5e-9f60-718293a4b5c6";
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .and(body_partial_json(json!({ "email": "carla@exemplo.com", "data": { "nome_completo": "Carla Dias" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": { "id": user_id, "email": "carla@exemplo.com" }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/profiles"))
            .and(query_param("id", format!("eq.{}", user_id)))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/pacientes"))
            .and(body_partial_json(json!({ "user_id": user_id, "convenio": "Particular" })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/user_roles"))
            .and(body_partial_json(json!({ "user_id": user_id, "role": "paciente" })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server, None);
        let user = store.register_patient(&registration()).await.unwrap();
        assert_eq!(user.id.to_string(), user_id);
    }

    #[tokio::test]
    async fn test_rpc_registration_is_single_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/registrar_paciente"))
            .and(body_partial_json(json!({ "email": "carla@exemplo.com", "nome_completo": "Carla Dias" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!("5e0c4f1a-2b3c-4d5e-9f60-718293a4b5c6")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let store = store_for(&server, Some("registrar_paciente"));
        let user = store.register_patient(&registration()).await.unwrap();
        assert_eq!(user.email, "carla@exemplo.com");
    }

    #[tokio::test]
    async fn test_rpc_failure_is_tagged_with_procedure_step() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/registrar_paciente"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "message": "null value in column \"user_id\" of relation \"user_roles\""
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server, Some("registrar_paciente"));
        let err = store.register_patient(&registration()).await.unwrap_err();

        assert!(matches!(
            err,
            StoreError::Registration { step: RegistrationStep::Procedure, .. }
        ));
        assert!(err.to_string().starts_with("Falha na execução do procedimento de cadastro"));
        assert!(matches!(err.root(), StoreError::QueryError(_)));
    }
}
