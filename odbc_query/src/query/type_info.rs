use super::{Query, QueryType};
use crate::app::{ApplicationDataBuffer, ColumnBindingMap, ConversionResult};
use crate::diagnostic::{Diagnosable, SqlResult, SqlState};
use crate::meta::{ColumnMeta, Nullability, SqlType, SQL_ALL_TYPES, SQL_NULLABLE};
use crate::protocol::Value;

const COLUMN_COUNT: u16 = 8;

/// `SQLGetTypeInfo`: one row per supported type, computed locally.
pub struct TypeInfoQuery {
    columns_meta: Vec<ColumnMeta>,
    types: Vec<SqlType>,
    executed: bool,
    fetched: bool,
    cursor: usize,
}

impl TypeInfoQuery {
    /// `sql_type` is an ODBC type code; `SQL_ALL_TYPES` selects every type.
    /// Unknown codes produce an empty result.
    pub fn new(sql_type: i16) -> Self {
        let types = if sql_type == SQL_ALL_TYPES {
            SqlType::ALL.to_vec()
        } else {
            SqlType::from_code(sql_type).into_iter().collect()
        };

        Self {
            columns_meta: columns_meta(),
            types,
            executed: false,
            fetched: false,
            cursor: 0,
        }
    }

    pub fn row_count(&self) -> usize {
        self.types.len()
    }

    fn current(&self) -> Option<SqlType> {
        if !self.fetched {
            return None;
        }
        self.types.get(self.cursor).copied()
    }

    fn put_column(
        &self,
        sql_type: SqlType,
        column_idx: u16,
        buffer: &mut dyn ApplicationDataBuffer,
        diag: &mut dyn Diagnosable,
    ) -> SqlResult {
        let Some(value) = column_value(sql_type, column_idx) else {
            diag.add_status_record(SqlState::InvalidDescriptorIndex, "Invalid column index.");
            return SqlResult::Error;
        };

        let row = i32::try_from(self.cursor + 1).unwrap_or(i32::MAX);
        match buffer.put_value(&value) {
            ConversionResult::Success => SqlResult::Success,
            ConversionResult::VarDataTruncated => {
                diag.add_status_record_at(
                    SqlState::StringDataRightTruncated,
                    "Buffer is too small for the column data. Truncated from the right.",
                    row,
                    i32::from(column_idx),
                );
                SqlResult::SuccessWithInfo
            }
            ConversionResult::Failure => {
                diag.add_status_record_at(
                    SqlState::GeneralError,
                    "Can not retrieve row column.",
                    row,
                    i32::from(column_idx),
                );
                SqlResult::Error
            }
        }
    }
}

impl Query for TypeInfoQuery {
    fn query_type(&self) -> QueryType {
        QueryType::TypeInfo
    }

    fn execute(&mut self, diag: &mut dyn Diagnosable) -> SqlResult {
        if self.executed {
            diag.add_status_record(
                SqlState::SequenceError,
                "Query cursor is in open state already.",
            );
            return SqlResult::Error;
        }

        self.executed = true;
        self.fetched = false;
        self.cursor = 0;
        SqlResult::Success
    }

    fn meta(&self) -> &[ColumnMeta] {
        &self.columns_meta
    }

    fn fetch_next_row(
        &mut self,
        bindings: &mut ColumnBindingMap,
        diag: &mut dyn Diagnosable,
    ) -> SqlResult {
        if !self.executed {
            diag.add_status_record(SqlState::SequenceError, "Query was not executed.");
            return SqlResult::Error;
        }

        if self.fetched {
            self.cursor = (self.cursor + 1).min(self.types.len());
        } else {
            self.fetched = true;
        }

        let Some(sql_type) = self.current() else {
            return SqlResult::NoData;
        };

        let mut result = SqlResult::Success;
        for (column_idx, buffer) in bindings.iter_mut() {
            let column = self.put_column(sql_type, *column_idx, buffer.as_mut(), diag);
            result = result.combine(column);
        }
        result
    }

    fn get_column(
        &mut self,
        column_idx: u16,
        buffer: &mut dyn ApplicationDataBuffer,
        diag: &mut dyn Diagnosable,
    ) -> SqlResult {
        if !self.executed {
            diag.add_status_record(SqlState::SequenceError, "Query was not executed.");
            return SqlResult::Error;
        }

        let Some(sql_type) = self.current() else {
            diag.add_status_record(
                SqlState::InvalidCursorState,
                "Cursor has reached end of the result set.",
            );
            return SqlResult::Error;
        };

        self.put_column(sql_type, column_idx, buffer, diag)
    }

    fn close(&mut self) -> SqlResult {
        self.executed = false;
        self.fetched = false;
        self.cursor = 0;
        SqlResult::Success
    }

    fn data_available(&self) -> bool {
        if !self.executed {
            return false;
        }
        let next = if self.fetched { self.cursor + 1 } else { 0 };
        next < self.types.len()
    }

    fn affected_rows(&self) -> i64 {
        0
    }

    fn next_result_set(&mut self) -> SqlResult {
        self.close();
        SqlResult::NoData
    }
}

fn columns_meta() -> Vec<ColumnMeta> {
    let column = |name: &str, data_type, nullability| {
        ColumnMeta::new("", "", name, data_type, nullability)
    };

    vec![
        column("TYPE_NAME", SqlType::Varchar, Nullability::NoNulls),
        column("DATA_TYPE", SqlType::SmallInt, Nullability::NoNulls),
        column("COLUMN_SIZE", SqlType::Integer, Nullability::Nullable),
        column("LITERAL_PREFIX", SqlType::Varchar, Nullability::Nullable),
        column("LITERAL_SUFFIX", SqlType::Varchar, Nullability::Nullable),
        column("NULLABLE", SqlType::SmallInt, Nullability::NoNulls),
        column("CASE_SENSITIVE", SqlType::SmallInt, Nullability::NoNulls),
        column("SEARCHABLE", SqlType::SmallInt, Nullability::NoNulls),
    ]
}

/// Value of 1-based column `column_idx` for `sql_type`'s row.
fn column_value(sql_type: SqlType, column_idx: u16) -> Option<Value> {
    if column_idx == 0 || column_idx > COLUMN_COUNT {
        return None;
    }

    let value = match column_idx {
        1 => Value::from(sql_type.name()),
        2 => Value::Integer(i32::from(sql_type.code())),
        3 => Value::Integer(sql_type.column_size()),
        4 => Value::from(sql_type.literal_prefix()),
        5 => Value::from(sql_type.literal_suffix()),
        6 => Value::Integer(i32::from(SQL_NULLABLE)),
        7 => Value::Integer(i32::from(sql_type.is_case_sensitive())),
        _ => Value::Integer(i32::from(sql_type.searchable())),
    };
    Some(value)
}
