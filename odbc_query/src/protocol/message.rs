use super::value::Value;
use super::wire::{WireReader, WireWriter};
use crate::app::{ParameterRow, ParameterSet};
use crate::diagnostic::SqlState;
use crate::error::{OdbcError, Result};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    ExecuteSqlQueryBatch = 8,
}

impl RequestType {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            8 => Some(Self::ExecuteSqlQueryBatch),
            _ => None,
        }
    }
}

/// Status codes carried by server responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Success,
    UnknownError,
    ParsingFailure,
    UnsupportedOperation,
    UnexpectedOperation,
    UnexpectedElementType,
    KeyUpdate,
    TableNotFound,
    ColumnNotFound,
    TableAlreadyExists,
    ColumnAlreadyExists,
    IndexAlreadyExists,
    IndexNotFound,
    NullKey,
    NullValue,
    DuplicateKey,
    ConcurrentUpdate,
    CacheNotFound,
    QueryCanceled,
    TransactionCompletion,
}

impl ResponseStatus {
    pub fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::UnknownError => 1,
            Self::ParsingFailure => 1001,
            Self::UnsupportedOperation => 1002,
            Self::UnexpectedOperation => 1003,
            Self::UnexpectedElementType => 1004,
            Self::KeyUpdate => 1005,
            Self::TableNotFound => 2001,
            Self::ColumnNotFound => 2002,
            Self::TableAlreadyExists => 3001,
            Self::ColumnAlreadyExists => 3002,
            Self::IndexAlreadyExists => 3003,
            Self::IndexNotFound => 3004,
            Self::NullKey => 4001,
            Self::NullValue => 4002,
            Self::DuplicateKey => 4003,
            Self::ConcurrentUpdate => 4004,
            Self::CacheNotFound => 4006,
            Self::QueryCanceled => 5001,
            Self::TransactionCompletion => 5002,
        }
    }

    /// Unknown codes fold into `UnknownError`.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Success,
            1001 => Self::ParsingFailure,
            1002 => Self::UnsupportedOperation,
            1003 => Self::UnexpectedOperation,
            1004 => Self::UnexpectedElementType,
            1005 => Self::KeyUpdate,
            2001 => Self::TableNotFound,
            2002 => Self::ColumnNotFound,
            3001 => Self::TableAlreadyExists,
            3002 => Self::ColumnAlreadyExists,
            3003 => Self::IndexAlreadyExists,
            3004 => Self::IndexNotFound,
            4001 => Self::NullKey,
            4002 => Self::NullValue,
            4003 => Self::DuplicateKey,
            4004 => Self::ConcurrentUpdate,
            4006 => Self::CacheNotFound,
            5001 => Self::QueryCanceled,
            5002 => Self::TransactionCompletion,
            _ => Self::UnknownError,
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }

    pub fn to_sql_state(self) -> SqlState {
        match self {
            Self::ParsingFailure | Self::KeyUpdate | Self::UnexpectedOperation => {
                SqlState::SyntaxErrorOrAccessViolation
            }
            Self::UnsupportedOperation => SqlState::OptionalFeatureNotImplemented,
            Self::UnexpectedElementType => SqlState::InvalidSqlDataType,
            Self::DuplicateKey | Self::NullKey | Self::NullValue => {
                SqlState::IntegrityConstraintViolation
            }
            Self::TableNotFound => SqlState::TableOrViewNotFound,
            Self::ColumnNotFound => SqlState::ColumnNotFound,
            Self::TableAlreadyExists => SqlState::TableOrViewAlreadyExists,
            Self::ColumnAlreadyExists => SqlState::ColumnAlreadyExists,
            Self::IndexAlreadyExists => SqlState::IndexAlreadyExists,
            Self::IndexNotFound => SqlState::IndexNotFound,
            Self::TransactionCompletion => SqlState::InvalidTransactionState,
            Self::QueryCanceled => SqlState::OperationCanceled,
            Self::Success
            | Self::UnknownError
            | Self::ConcurrentUpdate
            | Self::CacheNotFound => SqlState::GeneralError,
        }
    }
}

/// One page of an array-parameter execution: rows `[begin, end)` of `params`.
#[derive(Debug, Clone, Copy)]
pub struct QueryExecuteBatchRequest<'a> {
    schema: &'a str,
    sql: &'a str,
    params: &'a ParameterSet,
    begin: usize,
    end: usize,
    last: bool,
    timeout: u32,
}

impl<'a> QueryExecuteBatchRequest<'a> {
    pub fn new(
        schema: &'a str,
        sql: &'a str,
        params: &'a ParameterSet,
        begin: usize,
        end: usize,
        last: bool,
        timeout: u32,
    ) -> Self {
        Self {
            schema,
            sql,
            params,
            begin,
            end,
            last,
            timeout,
        }
    }

    pub fn row_count(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    pub fn is_last(&self) -> bool {
        self.last
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let rows = self.params.rows(self.begin..self.end).ok_or_else(|| {
            OdbcError::InternalError(format!(
                "Page [{}, {}) is outside of the parameter set of {} rows",
                self.begin,
                self.end,
                self.params.param_set_size()
            ))
        })?;

        let mut w = WireWriter::with_capacity(64 + self.sql.len());
        w.write_u8(RequestType::ExecuteSqlQueryBatch as u8);
        w.write_str(self.schema)?;
        w.write_str(self.sql)?;
        w.write_len(rows.len())?;
        for row in rows {
            w.write_len(row.len())?;
            for value in row {
                value.encode(&mut w)?;
            }
        }
        w.write_bool(self.last);
        w.write_u32(self.timeout);
        Ok(w.into_bytes())
    }
}

/// Server-side, owned view of an encoded [`QueryExecuteBatchRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteBatchFrame {
    pub schema: String,
    pub sql: String,
    pub rows: Vec<ParameterRow>,
    pub last: bool,
    pub timeout: u32,
}

impl ExecuteBatchFrame {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut r = WireReader::new(data);

        let tag = r.read_u8()?;
        match RequestType::from_u8(tag) {
            Some(RequestType::ExecuteSqlQueryBatch) => {}
            None => {
                return Err(OdbcError::Decode(format!("Unknown request type: {}", tag)));
            }
        }

        let schema = r.read_string()?;
        let sql = r.read_string()?;
        let row_count = r.read_len()?;
        let mut rows = Vec::with_capacity(row_count.min(r.remaining()));
        for _ in 0..row_count {
            let width = r.read_len()?;
            let mut row = Vec::with_capacity(width.min(r.remaining()));
            for _ in 0..width {
                row.push(Value::decode(&mut r)?);
            }
            rows.push(row);
        }
        let last = r.read_bool()?;
        let timeout = r.read_u32()?;

        if !r.is_exhausted() {
            return Err(OdbcError::Decode(format!(
                "{} trailing bytes after batch request",
                r.remaining()
            )));
        }

        Ok(Self {
            schema,
            sql,
            rows,
            last,
            timeout,
        })
    }
}

/// Result of one page.
///
/// `affected_rows` has one entry per row the server got an outcome for;
/// negative entries mean "no count for this row". A non-empty
/// `error_message` on a successful response flags a row that failed inside
/// an otherwise accepted page; `error_code` classifies it.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryExecuteBatchResponse {
    pub status: ResponseStatus,
    pub error: String,
    pub affected_rows: Vec<i64>,
    pub error_code: ResponseStatus,
    pub error_message: String,
}

impl QueryExecuteBatchResponse {
    pub fn success(affected_rows: Vec<i64>) -> Self {
        Self {
            status: ResponseStatus::Success,
            error: String::new(),
            affected_rows,
            error_code: ResponseStatus::Success,
            error_message: String::new(),
        }
    }

    pub fn partial(
        affected_rows: Vec<i64>,
        error_code: ResponseStatus,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            error_code,
            error_message: error_message.into(),
            ..Self::success(affected_rows)
        }
    }

    pub fn failure(status: ResponseStatus, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            affected_rows: Vec::new(),
            error_code: status,
            error_message: String::new(),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut w = WireWriter::new();
        w.write_i32(self.status.code());
        if !self.status.is_success() {
            w.write_str(&self.error)?;
            return Ok(w.into_bytes());
        }
        w.write_len(self.affected_rows.len())?;
        for n in &self.affected_rows {
            w.write_i64(*n);
        }
        w.write_i32(self.error_code.code());
        w.write_str(&self.error_message)?;
        Ok(w.into_bytes())
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut r = WireReader::new(data);

        let status = ResponseStatus::from_code(r.read_i32()?);
        if !status.is_success() {
            let error = r.read_string()?;
            return Ok(Self::failure(status, error));
        }

        let count = r.read_len()?;
        if count.saturating_mul(8) > r.remaining() {
            return Err(OdbcError::Decode(format!(
                "Affected rows count {} exceeds frame size",
                count
            )));
        }
        let mut affected_rows = Vec::with_capacity(count);
        for _ in 0..count {
            affected_rows.push(r.read_i64()?);
        }
        let error_code = ResponseStatus::from_code(r.read_i32()?);
        let error_message = r.read_string()?;

        Ok(Self {
            status,
            error: String::new(),
            affected_rows,
            error_code,
            error_message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(n: i32) -> ParameterSet {
        ParameterSet::from_rows((0..n).map(|i| vec![Value::Integer(i)]).collect()).unwrap()
    }

    #[test]
    fn test_response_status_code_mapping() {
        for status in [
            ResponseStatus::Success,
            ResponseStatus::ParsingFailure,
            ResponseStatus::TableNotFound,
            ResponseStatus::DuplicateKey,
            ResponseStatus::QueryCanceled,
        ] {
            assert_eq!(ResponseStatus::from_code(status.code()), status);
        }
        assert_eq!(ResponseStatus::from_code(-77), ResponseStatus::UnknownError);
    }

    #[test]
    fn test_response_status_to_sql_state() {
        assert_eq!(
            ResponseStatus::ParsingFailure.to_sql_state(),
            SqlState::SyntaxErrorOrAccessViolation
        );
        assert_eq!(
            ResponseStatus::DuplicateKey.to_sql_state(),
            SqlState::IntegrityConstraintViolation
        );
        assert_eq!(
            ResponseStatus::NullValue.to_sql_state(),
            SqlState::IntegrityConstraintViolation
        );
        assert_eq!(
            ResponseStatus::TableNotFound.to_sql_state(),
            SqlState::TableOrViewNotFound
        );
        assert_eq!(
            ResponseStatus::UnsupportedOperation.to_sql_state(),
            SqlState::OptionalFeatureNotImplemented
        );
        assert_eq!(
            ResponseStatus::QueryCanceled.to_sql_state(),
            SqlState::OperationCanceled
        );
        assert_eq!(
            ResponseStatus::UnknownError.to_sql_state(),
            SqlState::GeneralError
        );
    }

    #[test]
    fn test_request_encodes_only_its_page() {
        let params = params(5);
        let req = QueryExecuteBatchRequest::new("PUBLIC", "INSERT", &params, 2, 4, false, 30);
        assert_eq!(req.row_count(), 2);

        let frame = ExecuteBatchFrame::decode(&req.encode().unwrap()).unwrap();
        assert_eq!(frame.schema, "PUBLIC");
        assert_eq!(frame.sql, "INSERT");
        assert_eq!(
            frame.rows,
            vec![vec![Value::Integer(2)], vec![Value::Integer(3)]]
        );
        assert!(!frame.last);
        assert_eq!(frame.timeout, 30);
    }

    #[test]
    fn test_request_empty_page() {
        let params = ParameterSet::new();
        let req = QueryExecuteBatchRequest::new("", "DELETE", &params, 0, 0, true, 0);
        let frame = ExecuteBatchFrame::decode(&req.encode().unwrap()).unwrap();
        assert!(frame.rows.is_empty());
        assert!(frame.last);
    }

    #[test]
    fn test_request_out_of_range_page() {
        let params = params(2);
        let req = QueryExecuteBatchRequest::new("", "X", &params, 1, 3, true, 0);
        assert!(matches!(req.encode(), Err(OdbcError::InternalError(_))));
    }

    #[test]
    fn test_frame_rejects_unknown_request_type() {
        assert!(ExecuteBatchFrame::decode(&[42]).is_err());
    }

    #[test]
    fn test_frame_rejects_trailing_bytes() {
        let params = params(1);
        let mut bytes = QueryExecuteBatchRequest::new("", "X", &params, 0, 1, true, 0)
            .encode()
            .unwrap();
        bytes.push(0);
        assert!(ExecuteBatchFrame::decode(&bytes).is_err());
    }

    #[test]
    fn test_success_response_wire_layout() {
        let bytes = QueryExecuteBatchResponse::success(vec![1, -1])
            .encode()
            .unwrap();
        // status, count, two i64, error code, empty message
        assert_eq!(bytes.len(), 4 + 4 + 16 + 4 + 4);
        assert_eq!(&bytes[0..4], &0i32.to_le_bytes());
        assert_eq!(&bytes[4..8], &2u32.to_le_bytes());
    }

    #[test]
    fn test_partial_response_decodes() {
        let rsp = QueryExecuteBatchResponse::partial(
            vec![1, 1],
            ResponseStatus::DuplicateKey,
            "Duplicate key during INSERT",
        );
        let decoded = QueryExecuteBatchResponse::decode(&rsp.encode().unwrap()).unwrap();
        assert_eq!(decoded, rsp);
        assert!(decoded.status.is_success());
        assert_eq!(decoded.error_code, ResponseStatus::DuplicateKey);
    }

    #[test]
    fn test_failure_response_decodes_without_counts() {
        let rsp = QueryExecuteBatchResponse::failure(ResponseStatus::ParsingFailure, "bad sql");
        let decoded = QueryExecuteBatchResponse::decode(&rsp.encode().unwrap()).unwrap();
        assert_eq!(decoded.status, ResponseStatus::ParsingFailure);
        assert_eq!(decoded.error, "bad sql");
        assert!(decoded.affected_rows.is_empty());
    }

    #[test]
    fn test_response_count_larger_than_frame() {
        let mut w = WireWriter::new();
        w.write_i32(0);
        w.write_u32(1_000_000);
        assert!(QueryExecuteBatchResponse::decode(&w.into_bytes()).is_err());
    }
}
