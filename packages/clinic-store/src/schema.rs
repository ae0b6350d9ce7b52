//! Descrição estática das tabelas do store local
//!
//! As consultas SQL só usam identificadores presentes aqui; valores são
//! sempre passados por bind.

use crate::error::StoreError;
use crate::query::Collection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    Text,
    Integer,
    Real,
    Bool,
    Timestamp,
}

#[derive(Debug)]
pub(crate) struct ColumnDef {
    pub name: &'static str,
    pub kind: ColumnKind,
}

/// Chave estrangeira `local` apontando para `target.foreign`
#[derive(Debug)]
pub(crate) struct Relation {
    pub target: Collection,
    pub local: &'static str,
    pub foreign: &'static str,
}

#[derive(Debug)]
pub(crate) struct TableDef {
    pub collection: Collection,
    pub columns: &'static [ColumnDef],
    pub relations: &'static [Relation],
}

const fn col(name: &'static str, kind: ColumnKind) -> ColumnDef {
    ColumnDef { name, kind }
}

use ColumnKind::*;

static PROFILES: TableDef = TableDef {
    collection: Collection::Profiles,
    columns: &[
        col("id", Text),
        col("nome_completo", Text),
        col("cpf", Text),
        col("telefone", Text),
        col("data_nascimento", Text),
        col("created_at", Timestamp),
    ],
    relations: &[],
};

static PATIENTS: TableDef = TableDef {
    collection: Collection::Patients,
    columns: &[
        col("id", Text),
        col("user_id", Text),
        col("endereco", Text),
        col("convenio", Text),
        col("contato_emergencia", Text),
        col("observacoes", Text),
        col("created_at", Timestamp),
    ],
    relations: &[Relation {
        target: Collection::Profiles,
        local: "user_id",
        foreign: "id",
    }],
};

static PSYCHOLOGISTS: TableDef = TableDef {
    collection: Collection::Psychologists,
    columns: &[
        col("id", Text),
        col("user_id", Text),
        col("crp", Text),
        col("especializacao", Text),
        col("valor_consulta", Real),
        col("ativo", Bool),
        col("created_at", Timestamp),
    ],
    relations: &[Relation {
        target: Collection::Profiles,
        local: "user_id",
        foreign: "id",
    }],
};

static APPOINTMENTS: TableDef = TableDef {
    collection: Collection::Appointments,
    columns: &[
        col("id", Text),
        col("data_hora", Timestamp),
        col("status", Text),
        col("duracao_minutos", Integer),
        col("psicologo_id", Text),
        col("paciente_id", Text),
        col("observacoes", Text),
        col("created_at", Timestamp),
    ],
    relations: &[
        Relation {
            target: Collection::Psychologists,
            local: "psicologo_id",
            foreign: "id",
        },
        Relation {
            target: Collection::Patients,
            local: "paciente_id",
            foreign: "id",
        },
    ],
};

static USER_ROLES: TableDef = TableDef {
    collection: Collection::UserRoles,
    columns: &[
        col("id", Text),
        col("user_id", Text),
        col("role", Text),
        col("created_at", Timestamp),
    ],
    relations: &[Relation {
        target: Collection::Profiles,
        local: "user_id",
        foreign: "id",
    }],
};

pub(crate) fn table(collection: Collection) -> &'static TableDef {
    match collection {
        Collection::Profiles => &PROFILES,
        Collection::Patients => &PATIENTS,
        Collection::Psychologists => &PSYCHOLOGISTS,
        Collection::Appointments => &APPOINTMENTS,
        Collection::UserRoles => &USER_ROLES,
    }
}

impl TableDef {
    pub fn name(&self) -> &'static str {
        self.collection.table_name()
    }

    pub fn column(&self, name: &str) -> Result<&'static ColumnDef, StoreError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| {
                StoreError::QueryError(format!(
                    "Coluna desconhecida {}.{}",
                    self.name(),
                    name
                ))
            })
    }

    pub fn relation(&self, target: Collection) -> Result<&'static Relation, StoreError> {
        self.relations
            .iter()
            .find(|r| r.target == target)
            .ok_or_else(|| {
                StoreError::QueryError(format!(
                    "Nenhuma relação entre {} e {}",
                    self.name(),
                    target
                ))
            })
    }
}
