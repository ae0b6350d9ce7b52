//! Modelo de consulta genérico do store
//!
//! Uma [`Query`] descreve uma leitura sobre uma coleção: colunas, coleções
//! relacionadas embutidas, filtros, ordenação e limite. Os adaptadores
//! traduzem a mesma descrição para SQL (SQLite) ou para a sintaxe de URL do
//! PostgREST.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::StoreError;

/// Linha crua devolvida ou aceita pelo store
pub type Row = Map<String, Value>;

/// Coleções conhecidas do store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Profiles,
    Patients,
    Psychologists,
    Appointments,
    UserRoles,
}

impl Collection {
    /// Nome da tabela no store
    pub fn table_name(&self) -> &'static str {
        match self {
            Collection::Profiles => "profiles",
            Collection::Patients => "pacientes",
            Collection::Psychologists => "psicologos",
            Collection::Appointments => "agendamentos",
            Collection::UserRoles => "user_roles",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table_name())
    }
}

/// Colunas selecionadas de uma coleção
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Todas as colunas (`*`)
    All,
    /// Lista explícita de colunas
    Columns(Vec<&'static str>),
}

/// Tipo de junção com a coleção relacionada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// Linha pai mantida mesmo sem linha relacionada
    Left,
    /// Linha pai excluída quando a relacionada não existe (`!inner`)
    Inner,
}

/// Coleção relacionada embutida em cada linha do resultado
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub alias: &'static str,
    pub collection: Collection,
    pub selection: Selection,
    pub join: JoinKind,
}

impl Embed {
    pub fn left(collection: Collection, columns: &[&'static str]) -> Self {
        Self {
            alias: collection.table_name(),
            collection,
            selection: Selection::Columns(columns.to_vec()),
            join: JoinKind::Left,
        }
    }

    pub fn inner(collection: Collection, columns: &[&'static str]) -> Self {
        Self {
            join: JoinKind::Inner,
            ..Self::left(collection, columns)
        }
    }
}

/// Operadores de filtro suportados
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lt,
}

impl FilterOp {
    /// Operador na sintaxe do PostgREST
    pub fn postgrest(&self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Gte => "gte",
            FilterOp::Lt => "lt",
        }
    }

    /// Operador SQL
    pub fn sql(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Gte => ">=",
            FilterOp::Lt => "<",
        }
    }
}

/// Valor comparado por um filtro
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Integer(i64),
    Bool(bool),
}

impl FilterValue {
    /// Representação textual usada na URL e nos binds
    pub fn to_param(&self) -> String {
        match self {
            FilterValue::Text(text) => text.clone(),
            FilterValue::Uuid(id) => id.to_string(),
            FilterValue::Timestamp(ts) => ts.to_rfc3339_opts(SecondsFormat::Secs, true),
            FilterValue::Integer(n) => n.to_string(),
            FilterValue::Bool(b) => b.to_string(),
        }
    }
}

/// Filtro `coluna <op> valor`
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: &'static str,
    pub op: FilterOp,
    pub value: FilterValue,
}

impl Filter {
    pub fn eq(column: &'static str, value: FilterValue) -> Self {
        Self { column, op: FilterOp::Eq, value }
    }

    pub fn gte(column: &'static str, value: FilterValue) -> Self {
        Self { column, op: FilterOp::Gte, value }
    }

    pub fn lt(column: &'static str, value: FilterValue) -> Self {
        Self { column, op: FilterOp::Lt, value }
    }
}

/// Ordenação do resultado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub column: &'static str,
    pub ascending: bool,
}

/// Leitura sobre uma coleção
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: Collection,
    pub selection: Selection,
    pub embeds: Vec<Embed>,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<u32>,
}

impl Query {
    pub fn from(collection: Collection) -> Self {
        Self {
            collection,
            selection: Selection::All,
            embeds: Vec::new(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn columns(mut self, columns: &[&'static str]) -> Self {
        self.selection = Selection::Columns(columns.to_vec());
        self
    }

    pub fn embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_desc(mut self, column: &'static str) -> Self {
        self.order = Some(Order { column, ascending: false });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Parâmetro `select` do PostgREST, ex.: `id,profiles:profiles!inner(nome_completo)`
    pub fn select_clause(&self) -> String {
        let mut parts = match &self.selection {
            Selection::All => vec!["*".to_string()],
            Selection::Columns(cols) => cols.iter().map(|c| c.to_string()).collect(),
        };
        for embed in &self.embeds {
            let cols = match &embed.selection {
                Selection::All => "*".to_string(),
                Selection::Columns(cols) => cols.join(","),
            };
            let hint = match embed.join {
                JoinKind::Inner => "!inner",
                JoinKind::Left => "",
            };
            parts.push(format!(
                "{}:{}{}({})",
                embed.alias,
                embed.collection.table_name(),
                hint,
                cols
            ));
        }
        parts.join(",")
    }
}

/// Decodifica linhas cruas em um tipo nominal, falhando com erro tipado
pub fn decode_rows<T: DeserializeOwned>(
    collection: Collection,
    rows: Vec<Value>,
) -> Result<Vec<T>, StoreError> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            serde_json::from_value(row).map_err(|e| StoreError::Decode {
                collection,
                message: format!("linha {}: {}", index, e),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatientListing;
    use serde_json::json;

    #[test]
    fn test_select_clause_with_inner_embed() {
        let query = Query::from(Collection::Patients)
            .columns(&["id", "created_at"])
            .embed(Embed::inner(Collection::Profiles, &["nome_completo", "cpf"]));

        assert_eq!(
            query.select_clause(),
            "id,created_at,profiles:profiles!inner(nome_completo,cpf)"
        );
    }

    #[test]
    fn test_select_clause_with_left_embeds() {
        let query = Query::from(Collection::Appointments)
            .embed(Embed::left(Collection::Psychologists, &["user_id"]))
            .embed(Embed::left(Collection::Patients, &["user_id"]));

        assert_eq!(
            query.select_clause(),
            "*,psicologos:psicologos(user_id),pacientes:pacientes(user_id)"
        );
    }

    #[test]
    fn test_timestamp_param_is_utc() {
        let ts = DateTime::parse_from_rfc3339("2026-10-19T00:00:00-03:00")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(FilterValue::Timestamp(ts).to_param(), "2026-10-19T03:00:00Z");
    }

    #[test]
    fn test_decode_rows_reports_collection() {
        let rows = vec![json!({ "id": "nao-e-uuid" })];
        let result = decode_rows::<PatientListing>(Collection::Patients, rows);

        match result {
            Err(StoreError::Decode { collection, message }) => {
                assert_eq!(collection, Collection::Patients);
                assert!(message.starts_with("linha 0"));
            }
            other => panic!("esperava erro de decodificação, obteve {:?}", other.map(|r| r.len())),
        }
    }
}
