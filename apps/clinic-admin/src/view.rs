//! Modelos de visualização compartilhados pelas páginas
//!
//! Cada página de listagem passa pelos estados carregando, vazio, preenchido
//! ou falha, e é entregue ao cliente como uma [`TableView`].

use clinic_store::StoreError;
use serde::Serialize;

/// Texto exibido enquanto a leitura está em andamento
pub const LOADING_MESSAGE: &str = "Carregando...";

/// Estado de uma página de listagem
#[derive(Debug, Clone, PartialEq)]
pub enum PageState<T> {
    Loading,
    Empty,
    Populated(Vec<T>),
    Failed(Notice),
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        PageState::Loading
    }
}

impl<T> PageState<T> {
    /// Estado final de uma leitura; falhas viram aviso com o título dado
    pub fn from_result(result: Result<Vec<T>, StoreError>, failure_title: &str) -> Self {
        match result {
            Ok(rows) if rows.is_empty() => PageState::Empty,
            Ok(rows) => PageState::Populated(rows),
            Err(e) => PageState::Failed(Notice::destructive(failure_title, e.message())),
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            PageState::Failed(notice) => Some(notice),
            _ => None,
        }
    }
}

/// Variante visual de um aviso
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeVariant {
    Default,
    Destructive,
}

/// Aviso transitório exibido ao operador
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Default,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Destructive,
        }
    }
}

/// Cor de um selo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Blue,
    Green,
    Yellow,
    Purple,
    Red,
    Neutral,
}

/// Selo de status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: String,
    pub tone: Tone,
}

impl Badge {
    pub fn new(label: impl Into<String>, tone: Tone) -> Self {
        Self {
            label: label.into(),
            tone,
        }
    }
}

/// Célula de tabela
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    Text { text: String },
    Badge { badge: Badge },
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Cell::Text { text: text.into() }
    }

    /// Texto opcional com valor substituto quando ausente ou vazio
    pub fn or(value: Option<&str>, fallback: &str) -> Self {
        match value {
            Some(v) if !v.is_empty() => Cell::text(v),
            _ => Cell::text(fallback),
        }
    }

    pub fn badge(badge: Badge) -> Self {
        Cell::Badge { badge }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text { text } => Some(text),
            Cell::Badge { .. } => None,
        }
    }
}

/// Tabela pronta para exibição
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
    /// Linha única ocupando a tabela inteira (carregando ou vazio)
    pub placeholder: Option<String>,
}

impl TableView {
    pub fn render<T>(
        columns: &[&'static str],
        state: &PageState<T>,
        empty_message: &str,
        row: impl Fn(&T) -> Vec<Cell>,
    ) -> Self {
        let (rows, placeholder) = match state {
            PageState::Loading => (Vec::new(), Some(LOADING_MESSAGE.to_string())),
            PageState::Empty | PageState::Failed(_) => (Vec::new(), Some(empty_message.to_string())),
            PageState::Populated(items) => (items.iter().map(row).collect(), None),
        };
        Self {
            columns: columns.to_vec(),
            rows,
            placeholder,
        }
    }
}

/// Página de listagem completa
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub table: TableView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}
