use super::{SqlResult, SqlState};

/// Row or column number meaning "not associated with a particular row/column".
pub const UNKNOWN_POSITION: i32 = 0;

#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticRecord {
    pub sql_state: SqlState,
    pub message: String,
    pub row_number: i32,
    pub column_number: i32,
}

impl DiagnosticRecord {
    pub fn new(sql_state: SqlState, message: impl Into<String>) -> Self {
        Self {
            sql_state,
            message: message.into(),
            row_number: UNKNOWN_POSITION,
            column_number: UNKNOWN_POSITION,
        }
    }

    pub fn at(mut self, row_number: i32, column_number: i32) -> Self {
        self.row_number = row_number;
        self.column_number = column_number;
        self
    }

    /// Text as returned by `SQLGetDiagRec`, prefixed with the vendor tags.
    pub fn formatted_message(&self) -> String {
        format!("[odbc_query][{}] {}", self.sql_state, self.message)
    }
}

/// Sink for status records produced while an operation runs.
pub trait Diagnosable {
    fn add_status_record(&mut self, sql_state: SqlState, message: &str);

    fn add_status_record_at(
        &mut self,
        sql_state: SqlState,
        message: &str,
        row_number: i32,
        column_number: i32,
    );
}

/// Diagnostics owned by one statement handle.
///
/// Holds the header return code of the last operation and the status records
/// it produced. The statement resets the storage at the start of every call.
#[derive(Debug, Clone)]
pub struct DiagnosticRecordStorage {
    return_code: SqlResult,
    records: Vec<DiagnosticRecord>,
}

impl DiagnosticRecordStorage {
    pub fn new() -> Self {
        Self {
            return_code: SqlResult::Success,
            records: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.return_code = SqlResult::Success;
        self.records.clear();
    }

    pub fn set_header_record(&mut self, result: SqlResult) {
        self.return_code = result;
    }

    pub fn return_code(&self) -> SqlResult {
        self.return_code
    }

    pub fn is_successful(&self) -> bool {
        self.return_code.is_success()
    }

    pub fn status_records_number(&self) -> usize {
        self.records.len()
    }

    /// 1-based, as `SQLGetDiagRec` addresses records.
    pub fn get_status_record(&self, idx: usize) -> Option<&DiagnosticRecord> {
        idx.checked_sub(1).and_then(|i| self.records.get(i))
    }

    pub fn records(&self) -> &[DiagnosticRecord] {
        &self.records
    }

    pub fn push(&mut self, record: DiagnosticRecord) {
        self.records.push(record);
    }
}

impl Default for DiagnosticRecordStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnosable for DiagnosticRecordStorage {
    fn add_status_record(&mut self, sql_state: SqlState, message: &str) {
        self.push(DiagnosticRecord::new(sql_state, message));
    }

    fn add_status_record_at(
        &mut self,
        sql_state: SqlState,
        message: &str,
        row_number: i32,
        column_number: i32,
    ) {
        self.push(DiagnosticRecord::new(sql_state, message).at(row_number, column_number));
    }
}
