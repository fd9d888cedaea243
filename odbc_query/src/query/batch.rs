use super::{Query, QueryType};
use crate::app::{ApplicationDataBuffer, ColumnBindingMap, ParameterSet};
use crate::connection::{connection_timeout, Connection};
use crate::diagnostic::{Diagnosable, SqlResult, SqlState, UNKNOWN_POSITION};
use crate::error::TransportError;
use crate::meta::ColumnMeta;
use crate::observability::{get_global_metrics, Metrics, QueryLogger};
use crate::protocol::{QueryExecuteBatchRequest, QueryExecuteBatchResponse};
use log::Level;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// Executes one statement over an array of parameter rows.
///
/// Rows are sent in pages of at most `page_size` rows, in order. Each row's
/// affected count becomes one result set, walked with `next_result_set`.
/// A rejected page or a transport failure aborts execution; a page that
/// succeeds with a per-row error message only downgrades the result to
/// `SuccessWithInfo` and later pages still run.
pub struct BatchQuery {
    connection: Arc<dyn Connection>,
    sql: String,
    params: ParameterSet,
    timeout: u32,
    executed: bool,
    rows_affected: Vec<i64>,
    rows_affected_idx: usize,
    metrics: Arc<Metrics>,
    logger: Arc<QueryLogger>,
}

impl BatchQuery {
    pub fn new(
        connection: Arc<dyn Connection>,
        sql: impl Into<String>,
        params: ParameterSet,
        timeout: u32,
    ) -> Self {
        Self {
            connection,
            sql: sql.into(),
            params,
            timeout,
            executed: false,
            rows_affected: Vec::new(),
            rows_affected_idx: 0,
            metrics: get_global_metrics(),
            logger: Arc::new(QueryLogger::default()),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_logger(mut self, logger: Arc<QueryLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn timeout(&self) -> u32 {
        self.timeout
    }

    pub fn is_executed(&self) -> bool {
        self.executed
    }

    /// Per-row counts gathered by the last execution, in parameter order.
    pub fn rows_affected(&self) -> &[i64] {
        &self.rows_affected
    }

    /// Sends rows `[begin, end)` and folds the response into
    /// `rows_affected`. Returns `Error` when the page must abort execution.
    fn make_request_with_page(
        &mut self,
        begin: usize,
        end: usize,
        last: bool,
        diag: &mut dyn Diagnosable,
    ) -> SqlResult {
        let mut metadata = BTreeMap::new();
        metadata.insert("begin", begin.to_string());
        metadata.insert("end", end.to_string());
        metadata.insert("last", last.to_string());
        self.logger.log_page(Level::Debug, &metadata);

        let schema = self.connection.schema();
        let request = QueryExecuteBatchRequest::new(
            &schema,
            &self.sql,
            &self.params,
            begin,
            end,
            last,
            self.timeout,
        );
        let encoded = match request.encode() {
            Ok(bytes) => bytes,
            Err(e) => {
                self.logger.log_error(e.sql_state(), &e.to_string(), &metadata);
                diag.add_status_record(e.sql_state(), &e.to_string());
                self.metrics.record_page_failure(false);
                return SqlResult::Error;
            }
        };

        let started = Instant::now();
        let raw = match self
            .connection
            .sync_message(&encoded, connection_timeout(self.timeout))
        {
            Ok(raw) => raw,
            Err(err) => return self.on_transport_error(err, &metadata, diag),
        };
        let latency = started.elapsed();

        let rsp = match QueryExecuteBatchResponse::decode(&raw) {
            Ok(rsp) => rsp,
            Err(e) => {
                self.logger.log_error(e.sql_state(), &e.to_string(), &metadata);
                diag.add_status_record(e.sql_state(), &e.to_string());
                self.metrics.record_page_failure(false);
                return SqlResult::Error;
            }
        };

        if !rsp.status.is_success() {
            let state = rsp.status.to_sql_state();
            metadata.insert("status", rsp.status.code().to_string());
            self.logger.log_error(state, &rsp.error, &metadata);
            diag.add_status_record(state, &rsp.error);
            self.metrics.record_page_failure(false);
            return SqlResult::Error;
        }
        self.metrics.record_page(end - begin, latency);

        let mut counts = rsp.affected_rows;
        if counts.len() > end - begin {
            log::warn!(
                "Server returned {} counts for a page of {} rows; extra counts dropped",
                counts.len(),
                end - begin
            );
            counts.truncate(end - begin);
        }
        self.rows_affected.extend(counts);
        log::debug!("Rows affected so far: {}", self.rows_affected.len());

        if !rsp.error_message.is_empty() {
            let row = i32::try_from(self.rows_affected.len()).unwrap_or(i32::MAX);
            let state = rsp.error_code.to_sql_state();
            metadata.insert("row", row.to_string());
            self.logger.log_page(Level::Warn, &metadata);
            diag.add_status_record_at(state, &rsp.error_message, row, UNKNOWN_POSITION);
            self.metrics.record_row_warning();
            return SqlResult::SuccessWithInfo;
        }

        SqlResult::Success
    }

    fn on_transport_error(
        &self,
        err: TransportError,
        metadata: &BTreeMap<&str, String>,
        diag: &mut dyn Diagnosable,
    ) -> SqlResult {
        let timed_out = err.is_timeout();
        let (state, message) = if timed_out {
            (SqlState::TimeoutExpired, "Query timeout expired".to_string())
        } else {
            (err.sql_state(), err.to_string())
        };
        self.logger.log_error(state, &message, metadata);
        diag.add_status_record(state, &message);
        self.metrics.record_page_failure(timed_out);
        SqlResult::Error
    }
}

impl Query for BatchQuery {
    fn query_type(&self) -> QueryType {
        QueryType::Batch
    }

    fn execute(&mut self, diag: &mut dyn Diagnosable) -> SqlResult {
        if self.executed {
            diag.add_status_record(
                SqlState::SequenceError,
                "Query cursor is in open state already.",
            );
            return SqlResult::Error;
        }

        let row_num = self.params.param_set_size();
        let page_size = self.connection.configuration().page_size();
        if page_size == 0 {
            diag.add_status_record(SqlState::GeneralError, "Page size must be positive.");
            return SqlResult::Error;
        }

        self.rows_affected.clear();
        self.rows_affected_idx = 0;
        self.metrics.record_execute();

        let mut metadata = BTreeMap::new();
        metadata.insert("rows", row_num.to_string());
        metadata.insert("page_size", page_size.to_string());
        metadata.insert("timeout", self.timeout.to_string());
        self.logger.log_execute(&self.sql, &metadata);

        let mut result = SqlResult::Success;
        let mut processed = 0;
        while processed < row_num {
            let current_page_size = page_size.min(row_num - processed);
            let last_page = processed + current_page_size == row_num;

            let page = self.make_request_with_page(
                processed,
                processed + current_page_size,
                last_page,
                diag,
            );
            result = result.combine(page);
            if page == SqlResult::Error {
                break;
            }

            processed += current_page_size;
        }

        self.params.set_params_processed(self.rows_affected.len());
        self.executed = result.is_success();

        result
    }

    fn meta(&self) -> &[ColumnMeta] {
        &[]
    }

    fn fetch_next_row(
        &mut self,
        _bindings: &mut ColumnBindingMap,
        diag: &mut dyn Diagnosable,
    ) -> SqlResult {
        if !self.executed {
            diag.add_status_record(SqlState::SequenceError, "Query was not executed.");
            return SqlResult::Error;
        }
        SqlResult::NoData
    }

    fn get_column(
        &mut self,
        _column_idx: u16,
        _buffer: &mut dyn ApplicationDataBuffer,
        diag: &mut dyn Diagnosable,
    ) -> SqlResult {
        if !self.executed {
            diag.add_status_record(SqlState::SequenceError, "Query was not executed.");
            return SqlResult::Error;
        }
        diag.add_status_record(
            SqlState::InvalidCursorState,
            "Cursor has reached end of the result set.",
        );
        SqlResult::Error
    }

    fn close(&mut self) -> SqlResult {
        self.executed = false;
        self.rows_affected.clear();
        self.rows_affected_idx = 0;
        SqlResult::Success
    }

    fn data_available(&self) -> bool {
        false
    }

    fn affected_rows(&self) -> i64 {
        self.rows_affected
            .get(self.rows_affected_idx)
            .map(|n| (*n).max(0))
            .unwrap_or(0)
    }

    fn next_result_set(&mut self) -> SqlResult {
        if self.rows_affected_idx + 1 >= self.rows_affected.len() {
            self.close();
            return SqlResult::NoData;
        }
        self.rows_affected_idx += 1;
        SqlResult::Success
    }

    fn parameter_set(&self) -> Option<&ParameterSet> {
        Some(&self.params)
    }
}
