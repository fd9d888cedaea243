pub mod sql_type;

pub use sql_type::{SqlType, SQL_ALL_TYPES, SQL_NULLABLE, SQL_PRED_BASIC, SQL_SEARCHABLE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nullability {
    NoNulls,
    Nullable,
    Unknown,
}

/// Result column description returned by `GetMeta`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub schema_name: String,
    pub table_name: String,
    pub column_name: String,
    pub data_type: SqlType,
    pub nullability: Nullability,
}

impl ColumnMeta {
    pub fn new(
        schema_name: impl Into<String>,
        table_name: impl Into<String>,
        column_name: impl Into<String>,
        data_type: SqlType,
        nullability: Nullability,
    ) -> Self {
        Self {
            schema_name: schema_name.into(),
            table_name: table_name.into(),
            column_name: column_name.into(),
            data_type,
            nullability,
        }
    }
}

pub type ColumnMetaVector = Vec<ColumnMeta>;
