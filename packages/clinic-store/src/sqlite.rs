//! Adaptador SQLite do store
//!
//! Implementa o contrato completo de [`ClinicStore`] sobre um banco local,
//! incluindo a tabela `identities` que faz o papel do subsistema de
//! autenticação. O cadastro de paciente roda inteiro em uma transação.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use sqlx::sqlite::SqliteArguments;
use sqlx::{Arguments, Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::crypto::hash_password;
use crate::error::{RegistrationStep, StoreError};
use crate::models::{AuthUser, PatientRegistration, SignUp};
use crate::query::{Collection, Filter, FilterValue, JoinKind, Query, Row, Selection};
use crate::schema::{self, ColumnDef, ColumnKind, TableDef};
use crate::store::ClinicStore;
use crate::{init_db_pool, DbConfig};

/// Store local sobre um pool SQLite
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Abre o banco, aplicando as migrações pendentes
    pub async fn open(config: &DbConfig) -> anyhow::Result<Self> {
        Ok(Self::new(init_db_pool(config).await?))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

enum Bind {
    Text(String),
    Integer(i64),
    Real(f64),
    Bool(bool),
    Null,
}

fn arguments(binds: Vec<Bind>) -> SqliteArguments<'static> {
    let mut args = SqliteArguments::default();
    for bind in binds {
        match bind {
            Bind::Text(text) => args.add(text),
            Bind::Integer(n) => args.add(n),
            Bind::Real(x) => args.add(x),
            Bind::Bool(b) => args.add(b),
            Bind::Null => args.add(Option::<String>::None),
        }
    }
    args
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn filter_bind(value: &FilterValue) -> Bind {
    match value {
        FilterValue::Integer(n) => Bind::Integer(*n),
        FilterValue::Bool(b) => Bind::Bool(*b),
        other => Bind::Text(other.to_param()),
    }
}

/// Converte um valor JSON para bind, normalizando timestamps para UTC
fn json_bind(column: &ColumnDef, value: Value) -> Bind {
    match value {
        Value::Null => Bind::Null,
        Value::Bool(b) => Bind::Bool(b),
        Value::Number(n) => match (column.kind, n.as_i64()) {
            (ColumnKind::Real, _) | (_, None) => Bind::Real(n.as_f64().unwrap_or_default()),
            (_, Some(i)) => Bind::Integer(i),
        },
        Value::String(text) if column.kind == ColumnKind::Timestamp => {
            match DateTime::parse_from_rfc3339(&text) {
                Ok(ts) => Bind::Text(
                    ts.with_timezone(&Utc)
                        .to_rfc3339_opts(SecondsFormat::Micros, true),
                ),
                Err(_) => Bind::Text(text),
            }
        }
        Value::String(text) => Bind::Text(text),
        other => Bind::Text(other.to_string()),
    }
}

fn column_ref(alias: &str, column: &ColumnDef) -> String {
    match column.kind {
        ColumnKind::Timestamp => format!("julianday({}.{})", alias, column.name),
        _ => format!("{}.{}", alias, column.name),
    }
}

fn selected_columns(
    table: &'static TableDef,
    selection: &Selection,
) -> Result<Vec<&'static ColumnDef>, StoreError> {
    match selection {
        Selection::All => Ok(table.columns.iter().collect()),
        Selection::Columns(names) => names.iter().map(|name| table.column(name)).collect(),
    }
}

fn object_pairs(
    table: &'static TableDef,
    alias: &str,
    selection: &Selection,
) -> Result<Vec<String>, StoreError> {
    Ok(selected_columns(table, selection)?
        .into_iter()
        .map(|c| format!("'{}', {}.{}", c.name, alias, c.name))
        .collect())
}

fn check_alias(alias: &str) -> Result<(), StoreError> {
    if !alias.is_empty() && alias.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(StoreError::QueryError(format!("Alias inválido: {}", alias)))
    }
}

fn where_clause(
    table: &'static TableDef,
    filters: &[Filter],
    mut conditions: Vec<String>,
    binds: &mut Vec<Bind>,
) -> Result<String, StoreError> {
    for filter in filters {
        let column = table.column(filter.column)?;
        let placeholder = match column.kind {
            ColumnKind::Timestamp => "julianday(?)",
            _ => "?",
        };
        conditions.push(format!(
            "{} {} {}",
            column_ref("t", column),
            filter.op.sql(),
            placeholder
        ));
        binds.push(filter_bind(&filter.value));
    }
    if conditions.is_empty() {
        Ok(String::new())
    } else {
        Ok(format!(" WHERE {}", conditions.join(" AND ")))
    }
}

/// Junções embutidas: pares do `json_object` e condições `EXISTS` das internas
fn embed_parts(
    table: &'static TableDef,
    query: &Query,
) -> Result<(Vec<String>, Vec<String>), StoreError> {
    let mut pairs = Vec::new();
    let mut conditions = Vec::new();
    for (i, embed) in query.embeds.iter().enumerate() {
        check_alias(embed.alias)?;
        let related = schema::table(embed.collection);
        let relation = table.relation(embed.collection)?;
        let alias = format!("e{}", i);
        let from = format!(
            "FROM {} {} WHERE {}.{} = t.{}",
            related.name(),
            alias,
            alias,
            relation.foreign,
            relation.local
        );
        let object = object_pairs(related, &alias, &embed.selection)?.join(", ");
        pairs.push(format!(
            "'{}', json((SELECT json_object({}) {}))",
            embed.alias, object, from
        ));
        if embed.join == JoinKind::Inner {
            conditions.push(format!("EXISTS (SELECT 1 {})", from));
        }
    }
    Ok((pairs, conditions))
}

fn select_sql(query: &Query) -> Result<(String, Vec<Bind>), StoreError> {
    let table = schema::table(query.collection);
    let mut pairs = object_pairs(table, "t", &query.selection)?;
    let (embed_pairs, conditions) = embed_parts(table, query)?;
    pairs.extend(embed_pairs);

    let mut binds = Vec::new();
    let mut sql = format!(
        "SELECT json_object({}) FROM {} t",
        pairs.join(", "),
        table.name()
    );
    sql.push_str(&where_clause(table, &query.filters, conditions, &mut binds)?);

    if let Some(order) = query.order {
        let column = table.column(order.column)?;
        let direction = if order.ascending { "ASC" } else { "DESC" };
        sql.push_str(&format!(
            " ORDER BY {} {}, t.rowid {}",
            column_ref("t", column),
            direction,
            direction
        ));
    }
    if let Some(limit) = query.limit {
        sql.push_str(" LIMIT ?");
        binds.push(Bind::Integer(i64::from(limit)));
    }
    Ok((sql, binds))
}

fn count_sql(query: &Query) -> Result<(String, Vec<Bind>), StoreError> {
    let table = schema::table(query.collection);
    let (_, conditions) = embed_parts(table, query)?;
    let mut binds = Vec::new();
    let mut sql = format!("SELECT COUNT(*) FROM {} t", table.name());
    sql.push_str(&where_clause(table, &query.filters, conditions, &mut binds)?);
    Ok((sql, binds))
}

/// SQLite devolve booleanos como 0/1; o contrato do store usa `true`/`false`
fn normalize_row(table: &'static TableDef, query: &Query, row: &mut Row) {
    normalize_bools(table, row);
    for embed in &query.embeds {
        if let Some(Value::Object(nested)) = row.get_mut(embed.alias) {
            normalize_bools(schema::table(embed.collection), nested);
        }
    }
}

fn normalize_bools(table: &'static TableDef, row: &mut Row) {
    for column in table.columns.iter().filter(|c| c.kind == ColumnKind::Bool) {
        if let Some(value) = row.get_mut(column.name) {
            if let Some(n) = value.as_i64() {
                *value = Value::Bool(n != 0);
            }
        }
    }
}

async fn insert_row(
    conn: &mut SqliteConnection,
    collection: Collection,
    mut row: Row,
) -> Result<(), StoreError> {
    let table = schema::table(collection);
    row.entry("id")
        .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
    row.entry("created_at")
        .or_insert_with(|| Value::String(now_timestamp()));

    let mut columns = Vec::with_capacity(row.len());
    let mut binds = Vec::with_capacity(row.len());
    for (name, value) in row {
        let column = table.column(&name)?;
        columns.push(column.name);
        binds.push(json_bind(column, value));
    }

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.name(),
        columns.join(", "),
        vec!["?"; columns.len()].join(", ")
    );
    debug!(table = table.name(), "Inserindo registro");
    sqlx::query_with::<Sqlite, _>(&sql, arguments(binds))
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn update_rows(
    conn: &mut SqliteConnection,
    collection: Collection,
    patch: Row,
    filter: &Filter,
) -> Result<u64, StoreError> {
    let table = schema::table(collection);
    if patch.is_empty() {
        return Ok(0);
    }

    let mut assignments = Vec::with_capacity(patch.len());
    let mut binds = Vec::with_capacity(patch.len() + 1);
    for (name, value) in patch {
        let column = table.column(&name)?;
        assignments.push(format!("{} = ?", column.name));
        binds.push(json_bind(column, value));
    }
    let target = table.column(filter.column)?;
    binds.push(filter_bind(&filter.value));

    let sql = format!(
        "UPDATE {} SET {} WHERE {} {} ?",
        table.name(),
        assignments.join(", "),
        target.name,
        filter.op.sql()
    );
    let result = sqlx::query_with::<Sqlite, _>(&sql, arguments(binds))
        .execute(&mut *conn)
        .await?;
    debug!(table = table.name(), rows = result.rows_affected(), "Registros atualizados");
    Ok(result.rows_affected())
}

/// Cria identidade e perfil; o nome vem de `metadata.nome_completo`
///
/// Deve ser a primeira instrução da transação: o lock de escrita é obtido
/// já no INSERT. E-mail repetido é detectado pela restrição UNIQUE.
async fn create_identity(
    conn: &mut SqliteConnection,
    request: &SignUp,
    password_hash: &str,
) -> Result<AuthUser, StoreError> {
    let email = request.email.trim().to_lowercase();
    let id = Uuid::new_v4();
    let created_at = now_timestamp();
    let full_name = request
        .metadata
        .get("nome_completo")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    sqlx::query("INSERT INTO identities (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)")
        .bind(id.to_string())
        .bind(&email)
        .bind(password_hash)
        .bind(&created_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| match StoreError::from(e) {
            StoreError::ConstraintViolation(_) => {
                StoreError::AuthError("Usuário já cadastrado".to_string())
            }
            other => other,
        })?;

    sqlx::query("INSERT INTO profiles (id, nome_completo, created_at) VALUES (?, ?, ?)")
        .bind(id.to_string())
        .bind(full_name)
        .bind(&created_at)
        .execute(&mut *conn)
        .await?;

    Ok(AuthUser { id, email })
}

#[async_trait]
impl ClinicStore for SqliteStore {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, StoreError> {
        let (sql, binds) = select_sql(query)?;
        let table = schema::table(query.collection);
        let raw: Vec<String> = sqlx::query_scalar_with::<Sqlite, String, _>(&sql, arguments(binds))
            .fetch_all(&self.pool)
            .await?;

        raw.iter()
            .map(|text| {
                let mut row: Row = serde_json::from_str(text).map_err(|e| StoreError::Decode {
                    collection: query.collection,
                    message: e.to_string(),
                })?;
                normalize_row(table, query, &mut row);
                Ok(Value::Object(row))
            })
            .collect()
    }

    async fn count(&self, query: &Query) -> Result<u64, StoreError> {
        let (sql, binds) = count_sql(query)?;
        let total: i64 = sqlx::query_scalar_with::<Sqlite, i64, _>(&sql, arguments(binds))
            .fetch_one(&self.pool)
            .await?;
        Ok(total.max(0) as u64)
    }

    async fn insert(&self, collection: Collection, row: Row) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        insert_row(&mut conn, collection, row).await
    }

    async fn update(&self, collection: Collection, patch: Row, filter: Filter) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        update_rows(&mut conn, collection, patch, &filter).await?;
        Ok(())
    }

    async fn sign_up(&self, request: &SignUp) -> Result<AuthUser, StoreError> {
        let password_hash = hash_password(&request.password)?;
        let mut tx = self.pool.begin().await?;
        let user = create_identity(&mut tx, request, &password_hash).await?;
        tx.commit().await?;
        info!(user_id = %user.id, "Identidade criada");
        Ok(user)
    }

    async fn register_patient(&self, registration: &PatientRegistration) -> Result<AuthUser, StoreError> {
        let sign_up = registration.sign_up();
        let password_hash =
            hash_password(&sign_up.password).map_err(|e| e.at_step(RegistrationStep::SignUp))?;
        let mut tx = self.pool.begin().await?;

        let result = async {
            let user = create_identity(&mut tx, &sign_up, &password_hash)
                .await
                .map_err(|e| e.at_step(RegistrationStep::SignUp))?;
            update_rows(
                &mut tx,
                Collection::Profiles,
                registration.profile_patch(),
                &Filter::eq("id", FilterValue::Uuid(user.id)),
            )
            .await
            .map_err(|e| e.at_step(RegistrationStep::UpdateProfile))?;
            insert_row(&mut tx, Collection::Patients, registration.patient_row(user.id))
                .await
                .map_err(|e| e.at_step(RegistrationStep::InsertPatient))?;
            insert_row(&mut tx, Collection::UserRoles, registration.role_row(user.id))
                .await
                .map_err(|e| e.at_step(RegistrationStep::AssignRole))?;
            Ok::<_, StoreError>(user)
        }
        .await;

        match result {
            Ok(user) => {
                tx.commit().await?;
                info!(user_id = %user.id, "Paciente cadastrado em transação única");
                Ok(user)
            }
            Err(e) => {
                error!("Cadastro revertido: {}", e);
                if let Err(rollback) = tx.rollback().await {
                    error!("Falha ao reverter cadastro: {}", rollback);
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::verify_password;
    use crate::models::{Appointment, PatientListing, Psychologist};
    use crate::query::{decode_rows, Embed};
    use chrono::TimeZone;
    use serde_json::json;
    use tempfile::{tempdir, TempDir};
    use zeroize::Zeroizing;

    async fn open_store() -> anyhow::Result<(TempDir, SqliteStore)> {
        let dir = tempdir()?;
        let config = DbConfig {
            db_path: dir.path().join("clinica.db").display().to_string(),
            max_connections: 2,
        };
        let store = SqliteStore::open(&config).await?;
        Ok((dir, store))
    }

    fn sign_up(email: &str, name: &str) -> SignUp {
        SignUp {
            email: email.to_string(),
            password: Zeroizing::new("senha-gerada".to_string()),
            metadata: json!({ "nome_completo": name }).as_object().cloned().unwrap(),
        }
    }

    fn registration(email: &str) -> PatientRegistration {
        PatientRegistration {
            full_name: "Ana Lima".to_string(),
            email: email.to_string(),
            password: Zeroizing::new("senha-gerada".to_string()),
            national_id: Some("111.222.333-44".to_string()),
            phone: None,
            birth_date: Some("1985-03-12".to_string()),
            address: Some("Rua A, 10".to_string()),
            insurance: None,
            emergency_contact: None,
            notes: Some("Primeira consulta".to_string()),
        }
    }

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    fn patients_query() -> Query {
        Query::from(Collection::Patients)
            .columns(&["id", "user_id", "endereco", "contato_emergencia", "convenio", "created_at"])
            .embed(Embed::inner(Collection::Profiles, &["nome_completo", "cpf", "telefone"]))
            .order_desc("created_at")
    }

    #[tokio::test]
    async fn test_sign_up_rejects_duplicate_email() -> anyhow::Result<()> {
        let (_dir, store) = open_store().await?;

        let user = store.sign_up(&sign_up("Paula@Exemplo.com", "Paula Reis")).await?;
        assert_eq!(user.email, "paula@exemplo.com");

        let hash: String = sqlx::query_scalar("SELECT password_hash FROM identities WHERE id = ?")
            .bind(user.id.to_string())
            .fetch_one(store.pool())
            .await?;
        assert!(verify_password("senha-gerada", &hash)?);

        let err = store
            .sign_up(&sign_up("paula@exemplo.com", "Outra Paula"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AuthError(_)));
        Ok(())
    }

    #[tokio::test]
    async fn test_register_patient_is_listed_with_profile() -> anyhow::Result<()> {
        let (_dir, store) = open_store().await?;

        let user = store.register_patient(&registration("ana@exemplo.com")).await?;

        let rows = store.select(&patients_query()).await?;
        let patients: Vec<PatientListing> = decode_rows(Collection::Patients, rows)?;
        assert_eq!(patients.len(), 1);
        let patient = &patients[0];
        assert_eq!(patient.user_id, user.id);
        assert_eq!(patient.profile.full_name, "Ana Lima");
        assert_eq!(patient.profile.national_id.as_deref(), Some("111.222.333-44"));
        assert_eq!(patient.profile.phone, None);
        assert_eq!(patient.address.as_deref(), Some("Rua A, 10"));
        assert_eq!(patient.insurance, None);

        let roles: Vec<String> = sqlx::query_scalar("SELECT role FROM user_roles WHERE user_id = ?")
            .bind(user.id.to_string())
            .fetch_all(store.pool())
            .await?;
        assert_eq!(roles, vec!["paciente".to_string()]);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registrations_all_commit() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let store = SqliteStore::open(&DbConfig {
            db_path: dir.path().join("concorrente.db").display().to_string(),
            max_connections: 4,
        })
        .await?;

        let handles: Vec<_> = (0..12)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .register_patient(&registration(&format!("paciente{}@exemplo.com", i)))
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await??;
        }

        assert_eq!(store.count(&patients_query()).await?, 12);
        let roles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_roles")
            .fetch_one(store.pool())
            .await?;
        assert_eq!(roles, 12);
        Ok(())
    }

    #[tokio::test]
    async fn test_register_patient_rolls_back_on_failure() -> anyhow::Result<()> {
        let (_dir, store) = open_store().await?;
        sqlx::query(
            "CREATE TRIGGER falha_pacientes BEFORE INSERT ON pacientes \
             BEGIN SELECT RAISE(ABORT, 'falha simulada'); END;",
        )
        .execute(store.pool())
        .await?;

        let err = store
            .register_patient(&registration("ana@exemplo.com"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Registration {
                step: RegistrationStep::InsertPatient,
                ..
            }
        ));

        let identities: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM identities")
            .fetch_one(store.pool())
            .await?;
        let profiles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(store.pool())
            .await?;
        assert_eq!((identities, profiles), (0, 0));
        Ok(())
    }

    #[tokio::test]
    async fn test_appointments_left_and_inner_joins() -> anyhow::Result<()> {
        let (_dir, store) = open_store().await?;
        let user = store.register_patient(&registration("ana@exemplo.com")).await?;
        let patient_id: String = sqlx::query_scalar("SELECT id FROM pacientes WHERE user_id = ?")
            .bind(user.id.to_string())
            .fetch_one(store.pool())
            .await?;

        store
            .insert(
                Collection::Appointments,
                row(json!({
                    "data_hora": "2026-10-19T13:00:00-03:00",
                    "status": "confirmado",
                    "duracao_minutos": 50,
                    "paciente_id": patient_id,
                })),
            )
            .await?;
        store
            .insert(
                Collection::Appointments,
                row(json!({
                    "data_hora": "2026-10-20T09:00:00Z",
                    "status": "cancelado",
                    "duracao_minutos": 30,
                })),
            )
            .await?;

        let left = Query::from(Collection::Appointments)
            .embed(Embed::left(Collection::Psychologists, &["user_id"]))
            .embed(Embed::left(Collection::Patients, &["user_id"]))
            .order_desc("data_hora");
        let appointments: Vec<Appointment> =
            decode_rows(Collection::Appointments, store.select(&left).await?)?;
        assert_eq!(appointments.len(), 2);
        assert_eq!(appointments[0].duration_minutes, 30);
        assert!(appointments[0].patient.is_none());
        assert_eq!(appointments[1].patient.as_ref().map(|p| p.user_id), Some(user.id));
        assert_eq!(
            appointments[1].scheduled_at,
            Utc.with_ymd_and_hms(2026, 10, 19, 16, 0, 0).unwrap()
        );

        let inner = Query::from(Collection::Appointments)
            .embed(Embed::inner(Collection::Patients, &["user_id"]));
        assert_eq!(store.select(&inner).await?.len(), 1);
        assert_eq!(store.count(&inner).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_count_with_timestamp_range() -> anyhow::Result<()> {
        let (_dir, store) = open_store().await?;
        for data_hora in [
            "2026-10-18T23:59:59Z",
            "2026-10-19T00:00:00Z",
            "2026-10-19T23:59:59Z",
            "2026-10-20T00:00:00Z",
        ] {
            store
                .insert(
                    Collection::Appointments,
                    row(json!({ "data_hora": data_hora, "status": "agendado" })),
                )
                .await?;
        }

        let start = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 10, 20, 0, 0, 0).unwrap();
        let today = Query::from(Collection::Appointments)
            .filter(Filter::gte("data_hora", FilterValue::Timestamp(start)))
            .filter(Filter::lt("data_hora", FilterValue::Timestamp(end)));

        assert_eq!(store.count(&today).await?, 2);
        assert_eq!(store.count(&Query::from(Collection::Appointments)).await?, 4);
        Ok(())
    }

    #[tokio::test]
    async fn test_psychologists_decode_booleans_and_limit() -> anyhow::Result<()> {
        let (_dir, store) = open_store().await?;
        for (i, ativo) in [true, false, true].into_iter().enumerate() {
            let user = store
                .sign_up(&sign_up(&format!("psi{}@exemplo.com", i), "Dra. Psi"))
                .await?;
            store
                .insert(
                    Collection::Psychologists,
                    row(json!({
                        "user_id": user.id,
                        "crp": format!("06/{:05}", i),
                        "valor_consulta": 150,
                        "ativo": ativo,
                    })),
                )
                .await?;
        }

        let query = Query::from(Collection::Psychologists)
            .order_desc("created_at")
            .limit(2);
        let psychologists: Vec<Psychologist> =
            decode_rows(Collection::Psychologists, store.select(&query).await?)?;

        assert_eq!(psychologists.len(), 2);
        assert_eq!(psychologists[0].crp, "06/00002");
        assert!(psychologists[0].active);
        assert!(!psychologists[1].active);
        assert_eq!(psychologists[0].consultation_fee, Some(150.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_rejects_unknown_column() -> anyhow::Result<()> {
        let (_dir, store) = open_store().await?;
        let user = store.sign_up(&sign_up("x@exemplo.com", "Xavier")).await?;

        let err = store
            .update(
                Collection::Profiles,
                row(json!({ "senha": "nada" })),
                Filter::eq("id", FilterValue::Uuid(user.id)),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::QueryError(_)));
        Ok(())
    }
}
