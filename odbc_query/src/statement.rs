use crate::app::{ApplicationDataBuffer, ColumnBindingMap, ParameterSet};
use crate::connection::Connection;
use crate::diagnostic::{Diagnosable, DiagnosticRecordStorage, SqlResult, SqlState};
use crate::meta::ColumnMeta;
use crate::observability::{get_global_metrics, Metrics};
use crate::query::{BatchQuery, Query, TypeInfoQuery};
use std::sync::Arc;

/// Statement handle: dispatches ODBC calls to the current query and keeps
/// the diagnostics of the last call.
pub struct Statement {
    connection: Arc<dyn Connection>,
    diagnostics: DiagnosticRecordStorage,
    timeout: u32,
    current_query: Option<Box<dyn Query>>,
    metrics: Arc<Metrics>,
}

impl Statement {
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        Self {
            connection,
            diagnostics: DiagnosticRecordStorage::new(),
            timeout: 0,
            current_query: None,
            metrics: get_global_metrics(),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// `SQL_ATTR_QUERY_TIMEOUT` in seconds, `0` for none. Applies to queries
    /// prepared afterwards.
    pub fn set_query_timeout(&mut self, timeout_secs: u32) {
        self.timeout = timeout_secs;
    }

    pub fn query_timeout(&self) -> u32 {
        self.timeout
    }

    pub fn diagnostics(&self) -> &DiagnosticRecordStorage {
        &self.diagnostics
    }

    pub fn prepare_batch(&mut self, sql: &str, params: ParameterSet) -> SqlResult {
        self.api_call(|stmt| {
            stmt.close_current();
            let query = BatchQuery::new(stmt.connection.clone(), sql, params, stmt.timeout)
                .with_metrics(stmt.metrics.clone());
            stmt.current_query = Some(Box::new(query));
            SqlResult::Success
        })
    }

    /// `SQLGetTypeInfo`: replaces the current query and executes it.
    pub fn prepare_type_info(&mut self, sql_type: i16) -> SqlResult {
        self.api_call(|stmt| {
            stmt.close_current();
            let mut query = TypeInfoQuery::new(sql_type);
            let result = query.execute(&mut stmt.diagnostics);
            stmt.current_query = Some(Box::new(query));
            result
        })
    }

    pub fn execute(&mut self) -> SqlResult {
        self.api_call(|stmt| {
            let Some(query) = stmt.current_query.as_mut() else {
                stmt.diagnostics
                    .add_status_record(SqlState::SequenceError, "Query is not prepared.");
                return SqlResult::Error;
            };
            query.execute(&mut stmt.diagnostics)
        })
    }

    pub fn exec_direct_batch(&mut self, sql: &str, params: ParameterSet) -> SqlResult {
        let prepared = self.prepare_batch(sql, params);
        if !prepared.is_success() {
            return prepared;
        }
        self.execute()
    }

    pub fn fetch_row(&mut self, bindings: &mut ColumnBindingMap) -> SqlResult {
        self.api_call(|stmt| {
            let Some(query) = stmt.current_query.as_mut() else {
                stmt.diagnostics
                    .add_status_record(SqlState::SequenceError, "Query is not executed.");
                return SqlResult::Error;
            };
            query.fetch_next_row(bindings, &mut stmt.diagnostics)
        })
    }

    pub fn get_column(
        &mut self,
        column_idx: u16,
        buffer: &mut dyn ApplicationDataBuffer,
    ) -> SqlResult {
        self.api_call(|stmt| {
            let Some(query) = stmt.current_query.as_mut() else {
                stmt.diagnostics
                    .add_status_record(SqlState::SequenceError, "Query is not executed.");
                return SqlResult::Error;
            };
            query.get_column(column_idx, buffer, &mut stmt.diagnostics)
        })
    }

    /// `SQLMoreResults`. Without a query there is nothing more to report.
    pub fn more_results(&mut self) -> SqlResult {
        self.api_call(|stmt| match stmt.current_query.as_mut() {
            Some(query) => query.next_result_set(),
            None => SqlResult::NoData,
        })
    }

    /// `SQLRowCount` for the current result set.
    pub fn affected_rows(&mut self) -> Option<i64> {
        let mut rows = None;
        self.api_call(|stmt| {
            let Some(query) = stmt.current_query.as_ref() else {
                stmt.diagnostics
                    .add_status_record(SqlState::SequenceError, "Query is not executed.");
                return SqlResult::Error;
            };
            rows = Some(query.affected_rows());
            SqlResult::Success
        });
        rows
    }

    /// Rows processed by the last execution of a parameter-array query.
    pub fn params_processed(&self) -> Option<usize> {
        self.current_query
            .as_ref()
            .and_then(|q| q.parameter_set())
            .and_then(ParameterSet::params_processed)
    }

    pub fn meta(&self) -> &[ColumnMeta] {
        self.current_query.as_ref().map(|q| q.meta()).unwrap_or(&[])
    }

    pub fn data_available(&self) -> bool {
        self.current_query
            .as_ref()
            .map(|q| q.data_available())
            .unwrap_or(false)
    }

    /// `SQLCloseCursor` / `SQL_CLOSE`: the query stays prepared.
    pub fn close(&mut self) -> SqlResult {
        self.api_call(|stmt| stmt.close_current())
    }

    fn close_current(&mut self) -> SqlResult {
        self.current_query
            .as_mut()
            .map(|q| q.close())
            .unwrap_or(SqlResult::Success)
    }

    fn api_call(&mut self, call: impl FnOnce(&mut Self) -> SqlResult) -> SqlResult {
        self.diagnostics.reset();
        let result = call(self);
        self.diagnostics.set_header_record(result);
        result
    }
}
